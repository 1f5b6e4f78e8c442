use crate::{cell::CellPos, grid::Grid, STEP_COST};

/// Movement cost and remaining-cost estimate used by the search. For the search to return
/// shortest paths the heuristic must never overestimate and must satisfy the triangle
/// inequality with respect to [step_cost](Self::step_cost).
pub trait CostModel {
    /// Cost of moving between two orthogonally adjacent cells. Must be positive.
    fn step_cost(&self, grid: &Grid, from: &CellPos, to: &CellPos) -> i32;

    fn heuristic(&self, grid: &Grid, from: &CellPos, goal: &CellPos) -> i32;

    /// Sum of the step costs along a path.
    fn path_cost(&self, grid: &Grid, path: &[CellPos]) -> i32 {
        path.windows(2)
            .map(|w| self.step_cost(grid, &w[0], &w[1]))
            .sum()
    }
}

impl<M: CostModel + ?Sized> CostModel for &M {
    fn step_cost(&self, grid: &Grid, from: &CellPos, to: &CellPos) -> i32 {
        (**self).step_cost(grid, from, to)
    }

    fn heuristic(&self, grid: &Grid, from: &CellPos, goal: &CellPos) -> i32 {
        (**self).heuristic(grid, from, goal)
    }
}

/// Every step costs the same; the heuristic is the Manhattan distance in cells times that cost.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UniformCost {
    pub step: i32,
}

impl UniformCost {
    pub fn new() -> UniformCost {
        UniformCost { step: STEP_COST }
    }
}

impl Default for UniformCost {
    fn default() -> UniformCost {
        UniformCost::new()
    }
}

impl CostModel for UniformCost {
    fn step_cost(&self, _: &Grid, _: &CellPos, _: &CellPos) -> i32 {
        self.step
    }

    fn heuristic(&self, _: &Grid, from: &CellPos, goal: &CellPos) -> i32 {
        from.manhattan_distance(goal) as i32 * self.step
    }
}

/// Measures in pixels: both the step cost and the heuristic are the Manhattan distance between
/// cell centres, so one orthogonal step costs exactly one cell size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PixelCost;

impl PixelCost {
    fn center_distance(grid: &Grid, a: &CellPos, b: &CellPos) -> i32 {
        match (grid.cell(*a), grid.cell(*b)) {
            (Some(a), Some(b)) => {
                let (a, b) = (a.center(), b.center());
                (a.x - b.x).abs() + (a.y - b.y).abs()
            }
            // Off-grid positions never reach the search, fall back to the cell-unit distance
            _ => a.manhattan_distance(b) as i32 * grid.cell_size() as i32,
        }
    }
}

impl CostModel for PixelCost {
    fn step_cost(&self, grid: &Grid, from: &CellPos, to: &CellPos) -> i32 {
        PixelCost::center_distance(grid, from, to)
    }

    fn heuristic(&self, grid: &Grid, from: &CellPos, goal: &CellPos) -> i32 {
        PixelCost::center_distance(grid, from, goal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_heuristic_is_manhattan() {
        let grid = Grid::new(5, 5, 10).unwrap();
        let cost = UniformCost::new();
        let start = CellPos::new(0, 0);
        let goal = CellPos::new(4, 4);
        assert_eq!(cost.heuristic(&grid, &start, &goal), 8);
        assert_eq!(cost.heuristic(&grid, &goal, &goal), 0);
        assert_eq!(cost.step_cost(&grid, &start, &CellPos::new(0, 1)), 1);
    }

    #[test]
    fn pixel_cost_scales_with_cell_size() {
        let grid = Grid::new(5, 5, 25).unwrap();
        let start = CellPos::new(0, 0);
        assert_eq!(PixelCost.step_cost(&grid, &start, &CellPos::new(1, 0)), 25);
        assert_eq!(PixelCost.heuristic(&grid, &start, &CellPos::new(4, 4)), 200);
    }

    /// Consistency: h(a) <= step(a, b) + h(b) for every neighbour b of a.
    #[test]
    fn heuristics_are_consistent() {
        let grid = Grid::new(6, 6, 7).unwrap();
        let goal = CellPos::new(4, 1);
        let models: [&dyn CostModel; 2] = [&UniformCost::new(), &PixelCost];
        for model in models {
            for cell in grid.cells() {
                let a = cell.pos();
                for b in grid.neighbors(a) {
                    assert!(
                        model.heuristic(&grid, &a, &goal)
                            <= model.step_cost(&grid, &a, &b) + model.heuristic(&grid, &b, &goal)
                    );
                }
            }
        }
    }

    #[test]
    fn path_cost_sums_steps() {
        let grid = Grid::new(3, 3, 10).unwrap();
        let path = [CellPos::new(0, 0), CellPos::new(0, 1), CellPos::new(1, 1)];
        assert_eq!(UniformCost { step: 3 }.path_cost(&grid, &path), 6);
        assert_eq!(PixelCost.path_cost(&grid, &path[..1]), 0);
    }
}
