//! Animates a search in the terminal: random obstacles, start in the top-left corner, goal in
//! the bottom-right one. Every step redraws the board; the run is cut short after `--max-steps`.
use std::ops::ControlFlow;
use std::time::Duration;

use clap::Parser;
use grid_astar::{
    solver, CellPos, CellState, Grid, Paced, SearchOutcome, UniformCost, VisualizerConfig,
};
use rand::prelude::*;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long, default_value_t = 20)]
    grid_size: usize,

    #[arg(long, default_value_t = 0.25)]
    obstacle_density: f64,

    #[arg(long, default_value_t = 50)]
    delay_ms: u64,

    #[arg(long, default_value_t = usize::MAX)]
    max_steps: usize,

    #[arg(long, default_value_t = 0)]
    seed: u64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();
    let config = VisualizerConfig::for_window(500, args.grid_size)?
        .with_step_delay(Duration::from_millis(args.delay_ms));
    let mut grid = Grid::from_config(&config)?;

    let mut rng = StdRng::seed_from_u64(args.seed);
    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            if rng.gen_bool(args.obstacle_density) {
                grid.set_state(CellPos::new(row, col), CellState::Obstacle)?;
            }
        }
    }
    let last = grid.rows() - 1;
    grid.set_state(CellPos::new(0, 0), CellState::Start)?;
    grid.set_state(CellPos::new(last, last), CellState::Goal)?;

    let mut step = 0;
    let draw = |g: &Grid| {
        step += 1;
        // Clear the screen and move the cursor home
        print!("\x1b[2J\x1b[H");
        println!("step {}\n{}", step, g);
        if step >= args.max_steps {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    };
    let mut observer = Paced::from_config(draw, &config);
    let report = solver::run(&mut grid, UniformCost::new(), &mut observer)?;

    match report.outcome {
        SearchOutcome::Succeeded(result) => println!(
            "Path of {} steps found after {} expansions",
            result.steps(),
            report.expanded.len()
        ),
        SearchOutcome::Failed => println!("The goal cannot be reached"),
        SearchOutcome::Cancelled => println!("Stopped after {} steps", report.expanded.len()),
    }
    Ok(())
}
