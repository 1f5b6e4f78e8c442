//! Error types for grid construction, editing and search setup.

use thiserror::Error;

use crate::cell::Endpoint;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("invalid grid dimension {rows}x{cols}: rows and columns must be positive")]
    InvalidDimension { rows: usize, cols: usize },

    #[error("cell size must be at least one pixel")]
    InvalidCellSize,

    #[error("{cells} cells of {cell_size} px do not fit in pixel coordinates")]
    PixelOverflow { cells: usize, cell_size: u32 },

    #[error("cell ({row}, {col}) lies outside the {rows}x{cols} grid")]
    OutOfBounds {
        row: i64,
        col: i64,
        rows: usize,
        cols: usize,
    },

    #[error("search needs a {0} cell but none is set")]
    MissingEndpoint(Endpoint),

    #[error("unrecognised map symbol {symbol:?} at ({row}, {col})")]
    InvalidSymbol { symbol: char, row: usize, col: usize },
}

pub type Result<T> = std::result::Result<T, GridError>;
