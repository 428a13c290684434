use std::time::Duration;

use clap::Parser;
use mazepath::{
    generators::generate_maze,
    maze::Maze,
    solvers::{NoopSink, Solver},
};

/// Time every solver on seeded mazes without rendering.
#[derive(Debug, Parser)]
struct Args {
    /// Number of mazes to generate and solve
    #[arg(default_value_t = 10)]
    num_iters: u64,

    /// Side length of each square maze
    #[arg(long, default_value_t = 255, value_parser = clap::value_parser!(u16).range(2..))]
    size: u16,
}

#[derive(Default)]
struct Totals {
    elapsed: Duration,
    nodes_visited: usize,
    path_length: usize,
    solved: u64,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let size = args.size as usize;
    let mut totals = Solver::ALL.map(|_| Totals::default());

    for seed in 0..args.num_iters {
        let mut maze = Maze::new(size, size)?;
        generate_maze(&mut maze, Some(seed));
        maze.set_start((0, 0))?;
        maze.set_end((size - 1, size - 1))?;

        for (solver, total) in Solver::ALL.iter().zip(totals.iter_mut()) {
            let report = solver.run(&mut maze, &mut NoopSink);
            total.elapsed += report.elapsed;
            total.nodes_visited += report.nodes_visited;
            total.path_length += report.path_length;
            total.solved += report.outcome.is_ok() as u64;
        }
    }

    let runs = args.num_iters.max(1);
    println!("{} mazes of {size}x{size}", args.num_iters);
    for (solver, total) in Solver::ALL.iter().zip(totals.iter()) {
        println!(
            "{:<28} avg {:>9.3}ms  avg visited {:>8}  avg path {:>6}  solved {}/{}",
            solver.to_string(),
            total.elapsed.as_secs_f64() * 1000.0 / runs as f64,
            total.nodes_visited / runs as usize,
            total.path_length / runs as usize,
            total.solved,
            args.num_iters
        );
    }
    Ok(())
}
