use std::time::Duration;

use crate::error::{GridError, Result};

pub const DEFAULT_ROWS: usize = 20;
pub const DEFAULT_WINDOW_WIDTH: u32 = 500;
pub const DEFAULT_CELL_SIZE: u32 = DEFAULT_WINDOW_WIDTH / DEFAULT_ROWS as u32;
pub const DEFAULT_STEP_DELAY: Duration = Duration::from_millis(200);

/// Pixel length of `cells` consecutive cells, if it fits the `i32` pixel space.
pub(crate) fn pixel_extent(cells: usize, cell_size: u32) -> Option<i32> {
    let cells = i32::try_from(cells).ok()?;
    let cell_size = i32::try_from(cell_size).ok()?;
    cells.checked_mul(cell_size)
}

/// Options a host supplies when setting up a visualizer session. Only `rows` matters to the
/// search; `cell_size` and `step_delay` are for drawing and pacing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VisualizerConfig {
    /// Side length of the square grid, in cells.
    pub rows: usize,
    /// Side length of one cell, in pixels.
    pub cell_size: u32,
    /// Pause between two rendered search steps.
    pub step_delay: Duration,
}

impl Default for VisualizerConfig {
    fn default() -> VisualizerConfig {
        VisualizerConfig {
            rows: DEFAULT_ROWS,
            cell_size: DEFAULT_CELL_SIZE,
            step_delay: DEFAULT_STEP_DELAY,
        }
    }
}

impl VisualizerConfig {
    /// Splits a square window of `width` pixels into `rows` cells per side.
    pub fn for_window(width: u32, rows: usize) -> Result<VisualizerConfig> {
        if rows == 0 {
            return Err(GridError::InvalidDimension { rows, cols: rows });
        }
        let per_side =
            u32::try_from(rows).map_err(|_| GridError::InvalidDimension { rows, cols: rows })?;
        let config = VisualizerConfig {
            rows,
            cell_size: width / per_side,
            ..VisualizerConfig::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_step_delay(mut self, step_delay: Duration) -> VisualizerConfig {
        self.step_delay = step_delay;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.rows == 0 {
            return Err(GridError::InvalidDimension {
                rows: self.rows,
                cols: self.rows,
            });
        }
        if self.cell_size == 0 {
            return Err(GridError::InvalidCellSize);
        }
        self.window_width().map(|_| ())
    }

    /// Width of the drawing surface in pixels.
    pub fn window_width(&self) -> Result<u32> {
        pixel_extent(self.rows, self.cell_size)
            .and_then(|width| u32::try_from(width).ok())
            .ok_or(GridError::PixelOverflow {
                cells: self.rows,
                cell_size: self.cell_size,
            })
    }
}
