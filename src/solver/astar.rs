use fxhash::FxBuildHasher;
use indexmap::IndexSet;
use log::{debug, info, warn};

use crate::cell::{CellPos, CellState, Endpoint};
use crate::cost::CostModel;
use crate::error::{GridError, Result};
use crate::grid::Grid;
use crate::observer::StepObserver;
use crate::solver::frontier::Frontier;
use crate::solver::{PathResult, SearchOutcome, SearchReport, SearchState};

type FxIndexSet<K> = IndexSet<K, FxBuildHasher>;

/// A single A* run over a [Grid], advanced one expansion at a time.
///
/// The search writes its progress straight into the grid: discovered cells become
/// [CellState::Frontier], expanded ones [CellState::Visited] and, on success, the cells between
/// start and goal [CellState::Path]. A host can either drive it with [step](Self::step) from its
/// own frame loop or hand it a [StepObserver] through [run](Self::run).
///
/// A cell already waiting in the frontier keeps the cost of the route it was first discovered
/// by, even if a cheaper route turns up before it is expanded. Returned paths are therefore not
/// guaranteed to be shortest once obstacles force detours.
pub struct AStarSearch<'g, M> {
    grid: &'g mut Grid,
    model: M,
    start: CellPos,
    goal: CellPos,
    frontier: Frontier,
    expanded: FxIndexSet<CellPos>,
    state: SearchState,
    cancel_requested: bool,
    result: Option<PathResult>,
}

impl<'g, M: CostModel> AStarSearch<'g, M> {
    /// Prepares a search between the start and goal registered on the grid. Fails with
    /// [GridError::MissingEndpoint] without touching the grid if either is unset.
    pub fn new(grid: &'g mut Grid, model: M) -> Result<AStarSearch<'g, M>> {
        let start = grid
            .start()
            .ok_or(GridError::MissingEndpoint(Endpoint::Start))?;
        let goal = grid
            .goal()
            .ok_or(GridError::MissingEndpoint(Endpoint::Goal))?;
        Ok(AStarSearch::init(grid, model, start, goal))
    }

    /// Prepares a search between explicit endpoints, which are first placed on the grid as its
    /// start and goal. When both are the same cell it ends up as the start. Fails with
    /// [GridError::OutOfBounds] without touching the grid if either lies outside it.
    pub fn between(
        grid: &'g mut Grid,
        start: CellPos,
        goal: CellPos,
        model: M,
    ) -> Result<AStarSearch<'g, M>> {
        grid.state(start)?;
        grid.state(goal)?;
        grid.place(goal, CellState::Goal);
        grid.place(start, CellState::Start);
        Ok(AStarSearch::init(grid, model, start, goal))
    }

    fn init(grid: &'g mut Grid, model: M, start: CellPos, goal: CellPos) -> AStarSearch<'g, M> {
        info!("Searching a path from {} to {}", start, goal);
        grid.clear_search();
        grid.clear_annotations();
        let h = model.heuristic(grid, &start, &goal);
        let cell = grid.cell_mut(start);
        cell.cost_from_start = 0;
        cell.heuristic_to_goal = h;
        cell.predecessor = None;
        grid.mark(start, CellState::Frontier);
        let mut frontier = Frontier::new();
        frontier.push(start, h);
        AStarSearch {
            grid,
            model,
            start,
            goal,
            frontier,
            expanded: FxIndexSet::default(),
            state: SearchState::Running,
            cancel_requested: false,
            result: None,
        }
    }

    pub fn grid(&self) -> &Grid {
        &*self.grid
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    pub fn start(&self) -> CellPos {
        self.start
    }

    pub fn goal(&self) -> CellPos {
        self.goal
    }

    /// Cells expanded so far, in expansion order.
    pub fn expanded(&self) -> impl Iterator<Item = &CellPos> + '_ {
        self.expanded.iter()
    }

    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    /// Asks the search to stop. Takes effect at the start of the next [step](Self::step); cell
    /// markings made so far stay as they are.
    pub fn cancel(&mut self) {
        if !self.cancel_requested {
            debug!("Cancellation requested");
        }
        self.cancel_requested = true;
    }

    /// Performs one iteration: pops the most promising frontier cell, marks it visited and either
    /// finishes on the goal or discovers its neighbours.
    pub fn step(&mut self) -> SearchState {
        if self.state.is_done() {
            return self.state;
        }
        if self.cancel_requested {
            info!(
                "Search from {} to {} cancelled after {} expansions",
                self.start,
                self.goal,
                self.expanded.len()
            );
            self.state = SearchState::Cancelled;
            return self.state;
        }
        let Some((current, estimate)) = self.frontier.pop() else {
            warn!(
                "Frontier exhausted after {} expansions, {} is not reachable from {}",
                self.expanded.len(),
                self.goal,
                self.start
            );
            self.state = SearchState::Failed;
            return self.state;
        };
        self.grid.mark(current, CellState::Visited);
        let first_expansion = self.expanded.insert(current);
        debug_assert!(first_expansion, "{} expanded twice", current);
        debug!("Expanding {} with estimate {}", current, estimate);

        if current == self.goal {
            let cost = self.grid.at(current).cost_from_start();
            let path = self.reconstruct_path();
            info!(
                "Found a path of {} steps and cost {} after {} expansions",
                path.len() - 1,
                cost,
                self.expanded.len()
            );
            self.result = Some(PathResult { path, cost });
            self.state = SearchState::Succeeded;
            return self.state;
        }

        let cost = self.grid.at(current).cost_from_start();
        let neighbours = self.grid.neighbors(current).collect::<Vec<CellPos>>();
        for n in neighbours {
            // Cells already queued keep their first route
            if matches!(
                self.grid.at(n).state(),
                CellState::Frontier | CellState::Visited
            ) {
                continue;
            }
            let new_cost = cost.saturating_add(self.model.step_cost(self.grid, &current, &n));
            let h = self.model.heuristic(self.grid, &n, &self.goal);
            let cell = self.grid.cell_mut(n);
            cell.cost_from_start = new_cost;
            cell.heuristic_to_goal = h;
            cell.predecessor = Some(current);
            let estimated_cost = cell.total_estimated_cost();
            self.grid.mark(n, CellState::Frontier);
            self.frontier.push(n, estimated_cost);
        }
        self.state
    }

    /// Walks the predecessor links back from the goal and paints the route onto the grid.
    fn reconstruct_path(&mut self) -> Vec<CellPos> {
        let grid = &*self.grid;
        let start = self.start;
        let mut path = std::iter::successors(Some(self.goal), |&p| {
            if p == start {
                None
            } else {
                grid.at(p).predecessor()
            }
        })
        .take(grid.rows() * grid.cols())
        .collect::<Vec<CellPos>>();
        path.reverse();
        debug_assert_eq!(path.first(), Some(&self.start), "predecessor chain is broken");

        self.grid.place(self.goal, CellState::Goal);
        if let [_, inner @ .., _] = path.as_slice() {
            for &p in inner {
                self.grid.mark(p, CellState::Path);
            }
        }
        self.grid.place(self.start, CellState::Start);
        path
    }

    /// Steps until the search finishes, calling `observer` after every iteration that changed the
    /// grid. A [Break](std::ops::ControlFlow::Break) from the observer cancels the search.
    pub fn run<O: StepObserver + ?Sized>(mut self, observer: &mut O) -> SearchReport {
        loop {
            let state = self.step();
            if matches!(state, SearchState::Failed | SearchState::Cancelled) {
                break;
            }
            if observer.on_step(self.grid).is_break() {
                self.cancel();
            }
            if state == SearchState::Succeeded {
                break;
            }
        }
        self.into_report()
    }

    /// Consumes the search. One that never finished counts as cancelled.
    pub fn into_report(self) -> SearchReport {
        let outcome = match (self.state, self.result) {
            (SearchState::Succeeded, Some(result)) => SearchOutcome::Succeeded(result),
            (SearchState::Failed, _) | (SearchState::Succeeded, None) => SearchOutcome::Failed,
            (SearchState::Running, _) | (SearchState::Cancelled, _) => SearchOutcome::Cancelled,
        };
        SearchReport {
            outcome,
            expanded: self.expanded.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::ops::ControlFlow;

    use super::*;
    use crate::cost::UniformCost;
    use crate::observer::NoopObserver;

    fn pos(row: usize, col: usize) -> CellPos {
        CellPos::new(row, col)
    }

    #[test]
    fn missing_endpoints_leave_grid_untouched() {
        let mut grid: Grid = "x.\n.G".parse().unwrap();
        let before = grid.to_string();
        assert_eq!(
            AStarSearch::new(&mut grid, UniformCost::new()).err(),
            Some(GridError::MissingEndpoint(Endpoint::Start))
        );
        assert_eq!(grid.to_string(), before);

        let mut grid: Grid = "S.\n..".parse().unwrap();
        assert_eq!(
            AStarSearch::new(&mut grid, UniformCost::new()).err(),
            Some(GridError::MissingEndpoint(Endpoint::Goal))
        );
    }

    #[test]
    fn out_of_bounds_endpoints_leave_grid_untouched() {
        let mut grid = Grid::new(3, 3, 10).unwrap();
        assert!(matches!(
            AStarSearch::between(&mut grid, pos(0, 0), pos(3, 0), UniformCost::new()),
            Err(GridError::OutOfBounds { row: 3, .. })
        ));
        assert_eq!(grid.start(), None);
        assert_eq!(grid.count_state(CellState::Empty), 9);
    }

    #[test]
    fn initial_state() {
        let mut grid: Grid = "S...\n....\n...G".parse().unwrap();
        let search = AStarSearch::new(&mut grid, UniformCost::new()).unwrap();
        assert_eq!(search.state(), SearchState::Running);
        assert_eq!(search.frontier_len(), 1);
        let start = search.grid().cell_at(0, 0).unwrap();
        assert_eq!(start.state(), CellState::Frontier);
        assert_eq!(start.cost_from_start(), 0);
        assert_eq!(start.heuristic_to_goal(), 5);
        assert_eq!(start.total_estimated_cost(), 5);
        assert_eq!(start.predecessor(), None);
    }

    #[test]
    fn single_step_discovers_neighbours() {
        let mut grid: Grid = ".S.\n...\n..G".parse().unwrap();
        let mut search = AStarSearch::new(&mut grid, UniformCost::new()).unwrap();
        assert_eq!(search.step(), SearchState::Running);
        let grid = search.grid();
        assert_eq!(grid.state(pos(0, 1)).unwrap(), CellState::Visited);
        for n in [pos(1, 1), pos(0, 0), pos(0, 2)] {
            let cell = grid.cell(n).unwrap();
            assert_eq!(cell.state(), CellState::Frontier);
            assert_eq!(cell.cost_from_start(), 1);
            assert_eq!(cell.predecessor(), Some(pos(0, 1)));
        }
        assert_eq!(grid.cell(pos(1, 1)).unwrap().total_estimated_cost(), 3);
        assert_eq!(grid.cell(pos(0, 0)).unwrap().total_estimated_cost(), 5);
        assert!(!grid.cell(pos(2, 2)).unwrap().is_discovered());
        assert_eq!(search.frontier_len(), 3);
    }

    /// Two frontier entries share the same estimate; the one inserted last must be expanded
    /// first.
    #[test]
    fn equal_estimates_expand_latest_first() {
        // (1, 0) is discovered before (0, 1), both with estimate 2
        let mut grid: Grid = "S.\n.G".parse().unwrap();
        let report = AStarSearch::new(&mut grid, UniformCost::new())
            .unwrap()
            .run(&mut NoopObserver);
        assert_eq!(report.expanded, vec![pos(0, 0), pos(0, 1), pos(1, 1)]);
        assert_eq!(
            report.path().unwrap().path,
            vec![pos(0, 0), pos(0, 1), pos(1, 1)]
        );
        assert_eq!(grid.to_string(), "S*\noG\n");
    }

    #[test]
    fn start_equal_to_goal() {
        let mut grid = Grid::new(3, 3, 10).unwrap();
        let mut steps = 0;
        let report = AStarSearch::between(&mut grid, pos(1, 1), pos(1, 1), UniformCost::new())
            .unwrap()
            .run(&mut |_: &Grid| {
                steps += 1;
                ControlFlow::Continue(())
            });
        assert_eq!(steps, 1);
        let path = report.path().unwrap();
        assert_eq!(path.path, vec![pos(1, 1)]);
        assert_eq!(path.steps(), 0);
        assert_eq!(path.cost, 0);
        assert_eq!(grid.count_state(CellState::Path), 0);
        assert_eq!(grid.state(pos(1, 1)).unwrap(), CellState::Start);
    }

    #[test]
    fn between_places_endpoints() {
        let mut grid: Grid = "S..\n...\n..G".parse().unwrap();
        let report = AStarSearch::between(&mut grid, pos(0, 2), pos(2, 0), UniformCost::new())
            .unwrap()
            .run(&mut NoopObserver);
        assert!(report.is_success());
        assert_eq!(grid.start(), Some(pos(0, 2)));
        assert_eq!(grid.goal(), Some(pos(2, 0)));
        assert_eq!(grid.count_state(CellState::Start), 1);
        assert_eq!(grid.count_state(CellState::Goal), 1);
        assert_eq!(report.path().unwrap().steps(), 4);
    }

    #[test]
    fn cancellation_is_observed_on_next_iteration() {
        let mut grid: Grid = "S....\n.....\n.....\n.....\n....G".parse().unwrap();
        let mut calls = 0;
        let report = AStarSearch::new(&mut grid, UniformCost::new())
            .unwrap()
            .run(&mut |_: &Grid| {
                calls += 1;
                if calls == 2 {
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            });
        assert_eq!(calls, 2);
        assert_eq!(report.outcome, SearchOutcome::Cancelled);
        assert_eq!(report.expanded, vec![pos(0, 0), pos(0, 1)]);
        // No rollback: markings stay as the last iteration left them
        assert_eq!(grid.count_state(CellState::Visited), 2);
        assert_eq!(grid.count_state(CellState::Frontier), 3);
        assert_eq!(grid.count_state(CellState::Path), 0);
    }

    #[test]
    fn manual_cancel() {
        let mut grid: Grid = "S..\n...\n..G".parse().unwrap();
        let mut search = AStarSearch::new(&mut grid, UniformCost::new()).unwrap();
        search.step();
        search.cancel();
        assert_eq!(search.step(), SearchState::Cancelled);
        assert_eq!(search.step(), SearchState::Cancelled);
        assert_eq!(search.into_report().expanded.len(), 1);
    }

    #[test]
    fn abandoned_search_counts_as_cancelled() {
        let mut grid: Grid = "S..\n...\n..G".parse().unwrap();
        let search = AStarSearch::new(&mut grid, UniformCost::new()).unwrap();
        assert_eq!(search.into_report().outcome, SearchOutcome::Cancelled);
    }

    #[test]
    fn rerun_starts_from_clean_slate() {
        let mut grid: Grid = "S..\n.#.\n..G".parse().unwrap();
        let first = AStarSearch::new(&mut grid, UniformCost::new())
            .unwrap()
            .run(&mut NoopObserver);
        let painted = grid.to_string();
        let second = AStarSearch::new(&mut grid, UniformCost::new())
            .unwrap()
            .run(&mut NoopObserver);
        assert_eq!(first, second);
        assert_eq!(grid.to_string(), painted);
    }

    #[test]
    fn finished_search_ignores_further_steps() {
        let mut grid: Grid = "SG".parse().unwrap();
        let mut search = AStarSearch::new(&mut grid, UniformCost::new()).unwrap();
        while !search.step().is_done() {}
        assert_eq!(search.state(), SearchState::Succeeded);
        search.cancel();
        assert_eq!(search.step(), SearchState::Succeeded);
        assert_eq!(search.expanded().count(), 2);
    }

    /// A queued cell is never re-evaluated when a cheaper route to it shows up later, so the
    /// path around this obstacle takes 7 steps although 5 would do.
    #[test]
    fn queued_cells_keep_their_first_route() {
        let mut grid: Grid = "
            ..G..
            ..#..
            .....
            .....
            #..S.
        "
        .parse()
        .unwrap();
        let report = AStarSearch::new(&mut grid, UniformCost::new())
            .unwrap()
            .run(&mut NoopObserver);
        let path = report.path().unwrap();
        assert_eq!(
            path.path,
            vec![
                pos(4, 3),
                pos(3, 3),
                pos(3, 4),
                pos(2, 4),
                pos(1, 4),
                pos(1, 3),
                pos(0, 3),
                pos(0, 2)
            ]
        );
        assert_eq!(path.cost, 7);
        assert_eq!(UniformCost::new().path_cost(&grid, &path.path), 7);
    }
}
