use grid_astar::{solver, Grid, NoopObserver, UniformCost};

// In this example a path is found on a 5x5 grid with shape
//  _____
// |S #  |
// |  #  |
// |  #  |
// |  #  |
// |    G|
//  _____
// where
// - # marks an obstacle
// - S marks the start
// - G marks the goal
//
// The wall leaves only the bottom row open, so the search has to detour through it.

fn main() {
    env_logger::init();
    let mut grid: Grid = "
        S.#..
        ..#..
        ..#..
        ..#..
        ....G
    "
    .parse()
    .unwrap();
    let report = solver::run(&mut grid, UniformCost::new(), &mut NoopObserver).unwrap();
    println!("{}", grid);
    match report.path() {
        Some(result) => {
            println!("Path of {} steps:", result.steps());
            for p in &result.path {
                println!("{}", p);
            }
        }
        None => println!("No path ({:?})", report.state()),
    }
    println!("Expanded {} cells", report.expanded.len());
}
