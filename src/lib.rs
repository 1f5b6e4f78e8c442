//! # grid_astar
//!
//! The engine behind an interactive pathfinding visualizer. A host paints obstacles on a
//! [Grid], places a start and a goal, and then runs an
//! [A* search](https://en.wikipedia.org/wiki/A*_search_algorithm) that writes its progress
//! into the grid cell by cell: frontier, visited and finally path markings. After every
//! expansion the search hands control back through a [StepObserver] so the host can redraw,
//! pace the animation or cancel.
//!
//! Movement is 4-connected with uniform step cost and the Manhattan distance as heuristic.
//! Frontier ties are broken in favour of the most recently discovered cell, which makes every
//! run reproducible.
//!
//! ```
//! use std::ops::ControlFlow;
//! use grid_astar::{solver, CellPos, CellState, Grid, UniformCost};
//!
//! let mut grid: Grid = "
//!     S.#..
//!     ..#..
//!     ..#..
//!     ..#..
//!     ....G
//! "
//! .parse()
//! .unwrap();
//! let mut frames = 0;
//! let report = solver::run(&mut grid, UniformCost::new(), &mut |_: &Grid| {
//!     frames += 1;
//!     ControlFlow::Continue(())
//! })
//! .unwrap();
//! assert_eq!(report.path().unwrap().steps(), 8);
//! assert_eq!(grid.state(CellPos::new(4, 2)).unwrap(), CellState::Path);
//! assert_eq!(frames, report.expanded.len());
//! ```
pub mod cell;
pub mod config;
pub mod cost;
pub mod error;
pub mod grid;
pub mod observer;
pub mod solver;

pub use cell::{Cell, CellPos, CellState, Endpoint};
pub use config::VisualizerConfig;
pub use cost::{CostModel, PixelCost, UniformCost};
pub use error::{GridError, Result};
pub use grid::Grid;
pub use observer::{CancelAfter, NoopObserver, Paced, StepObserver};
pub use solver::{AStarSearch, PathResult, SearchOutcome, SearchReport, SearchState};

/// Cost of one orthogonal step in grid units.
pub const STEP_COST: i32 = 1;
/// Cost of a cell the search has not discovered yet.
pub const INFINITE_COST: i32 = i32::MAX;
