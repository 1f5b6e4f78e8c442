use crate::cell::CellPos;
use crate::cost::CostModel;
use crate::error::Result;
use crate::grid::Grid;
use crate::observer::StepObserver;

pub mod astar;
pub mod frontier;

pub use astar::AStarSearch;

/// Where a search run currently stands.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SearchState {
    Running,
    Succeeded,
    Failed,
    Cancelled,
}

impl SearchState {
    pub fn is_done(self) -> bool {
        self != SearchState::Running
    }
}

/// A reconstructed path, start first and goal last, with its total cost.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathResult {
    pub path: Vec<CellPos>,
    pub cost: i32,
}

impl PathResult {
    /// Number of moves along the path; zero when start and goal coincide.
    pub fn steps(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchOutcome {
    Succeeded(PathResult),
    Failed,
    Cancelled,
}

impl SearchOutcome {
    pub fn state(&self) -> SearchState {
        match self {
            SearchOutcome::Succeeded(_) => SearchState::Succeeded,
            SearchOutcome::Failed => SearchState::Failed,
            SearchOutcome::Cancelled => SearchState::Cancelled,
        }
    }
}

/// Final result of a run: the outcome plus every expanded cell in expansion order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchReport {
    pub outcome: SearchOutcome,
    pub expanded: Vec<CellPos>,
}

impl SearchReport {
    pub fn state(&self) -> SearchState {
        self.outcome.state()
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, SearchOutcome::Succeeded(_))
    }

    pub fn path(&self) -> Option<&PathResult> {
        match &self.outcome {
            SearchOutcome::Succeeded(result) => Some(result),
            _ => None,
        }
    }
}

/// Runs a search between the grid's own start and goal, calling `observer` after every step.
pub fn run<M, O>(grid: &mut Grid, model: M, observer: &mut O) -> Result<SearchReport>
where
    M: CostModel,
    O: StepObserver + ?Sized,
{
    Ok(AStarSearch::new(grid, model)?.run(observer))
}

/// Runs a search between explicit endpoints, see [AStarSearch::between].
pub fn run_between<M, O>(
    grid: &mut Grid,
    start: CellPos,
    goal: CellPos,
    model: M,
    observer: &mut O,
) -> Result<SearchReport>
where
    M: CostModel,
    O: StepObserver + ?Sized,
{
    Ok(AStarSearch::between(grid, start, goal, model)?.run(observer))
}
