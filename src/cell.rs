use core::fmt;
use grid_util::point::Point;

use crate::config::pixel_extent;
use crate::error::{GridError, Result};
use crate::INFINITE_COST;

/// Identity of a cell: its row and column in the grid.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellPos {
    pub row: usize,
    pub col: usize,
}

impl CellPos {
    pub const fn new(row: usize, col: usize) -> CellPos {
        CellPos { row, col }
    }

    /// Shifts the position by a signed offset, returning [None] if either coordinate would
    /// become negative. Upper bounds are the grid's business.
    pub fn offset(&self, d_row: isize, d_col: isize) -> Option<CellPos> {
        Some(CellPos {
            row: self.row.checked_add_signed(d_row)?,
            col: self.col.checked_add_signed(d_col)?,
        })
    }

    /// Number of orthogonal steps between two positions.
    pub fn manhattan_distance(&self, other: &CellPos) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

impl fmt::Display for CellPos {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl From<(usize, usize)> for CellPos {
    fn from((row, col): (usize, usize)) -> CellPos {
        CellPos { row, col }
    }
}

/// The two user-placed endpoints of a search.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Endpoint {
    Start,
    Goal,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Endpoint::Start => write!(f, "start"),
            Endpoint::Goal => write!(f, "goal"),
        }
    }
}

/// Closed set of states a cell can be in. Editing produces the first four, the search engine
/// produces the last three.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum CellState {
    #[default]
    Empty,
    Obstacle,
    Start,
    Goal,
    Frontier,
    Visited,
    Path,
}

impl CellState {
    /// Markings left behind by a search run.
    pub fn is_transient(self) -> bool {
        matches!(self, CellState::Frontier | CellState::Visited | CellState::Path)
    }

    pub fn is_passable(self) -> bool {
        self != CellState::Obstacle
    }

    /// Single character used by the ASCII rendering of a grid.
    pub fn symbol(self) -> char {
        match self {
            CellState::Empty => '.',
            CellState::Obstacle => '#',
            CellState::Start => 'S',
            CellState::Goal => 'G',
            CellState::Frontier => 'o',
            CellState::Visited => 'x',
            CellState::Path => '*',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<CellState> {
        Some(match symbol {
            '.' => CellState::Empty,
            '#' => CellState::Obstacle,
            'S' => CellState::Start,
            'G' => CellState::Goal,
            'o' => CellState::Frontier,
            'x' => CellState::Visited,
            '*' => CellState::Path,
            _ => return None,
        })
    }
}

/// A single grid cell. Besides its editing state it carries the annotations the search engine
/// writes while it runs; these are only meaningful for the most recent run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    pos: CellPos,
    origin: Point,
    size: i32,
    pub(crate) state: CellState,
    pub(crate) cost_from_start: i32,
    pub(crate) heuristic_to_goal: i32,
    pub(crate) predecessor: Option<CellPos>,
}

impl Cell {
    /// Fails with [GridError::PixelOverflow] if the far edge of the cell lies outside the `i32`
    /// pixel space, which also keeps [center](Self::center) in range.
    pub(crate) fn new(pos: CellPos, size: u32) -> Result<Cell> {
        let origin_of = |index: usize| {
            let cells = index.saturating_add(1);
            pixel_extent(cells, size)
                .and(pixel_extent(index, size))
                .ok_or(GridError::PixelOverflow {
                    cells,
                    cell_size: size,
                })
        };
        let origin = Point::new(origin_of(pos.col)?, origin_of(pos.row)?);
        Ok(Cell {
            pos,
            origin,
            size: i32::try_from(size).map_err(|_| GridError::InvalidCellSize)?,
            state: CellState::Empty,
            cost_from_start: INFINITE_COST,
            heuristic_to_goal: 0,
            predecessor: None,
        })
    }

    pub fn pos(&self) -> CellPos {
        self.pos
    }

    pub fn state(&self) -> CellState {
        self.state
    }

    /// Top-left pixel of the cell.
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Pixel centre of the cell, used by the continuous-coordinate cost model.
    pub fn center(&self) -> Point {
        Point::new(self.origin.x + self.size / 2, self.origin.y + self.size / 2)
    }

    /// Cost of the best known route from the start, [INFINITE_COST] until discovered.
    pub fn cost_from_start(&self) -> i32 {
        self.cost_from_start
    }

    pub fn heuristic_to_goal(&self) -> i32 {
        self.heuristic_to_goal
    }

    pub fn total_estimated_cost(&self) -> i32 {
        self.cost_from_start.saturating_add(self.heuristic_to_goal)
    }

    /// The cell this one was first discovered from. The start has none.
    pub fn predecessor(&self) -> Option<CellPos> {
        self.predecessor
    }

    pub fn is_discovered(&self) -> bool {
        self.cost_from_start != INFINITE_COST
    }

    pub(crate) fn clear_annotations(&mut self) {
        self.cost_from_start = INFINITE_COST;
        self.heuristic_to_goal = 0;
        self.predecessor = None;
    }
}
