mod renderer;

use std::{
    io::{Stdout, Write},
    path::PathBuf,
    time::Duration,
};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use crossterm::{
    cursor, queue,
    style::{Color, Stylize},
    terminal::{self, ClearType},
};

pub use renderer::{Renderer, Tile, tile_at, tile_dims};

use crate::{
    generators::generate_maze,
    maze::{Coord, Maze},
    solvers::{NoopSink, SolveError, SolveReport, Solver},
};

/// Generate a maze and watch graph searches find a route through it.
#[derive(Debug, Parser)]
#[command(name = "mazepath", version, about)]
pub struct Cli {
    /// Number of cell rows
    #[arg(default_value_t = App::DEFAULT_ROWS, value_parser = clap::value_parser!(u16).range(1..))]
    pub rows: u16,

    /// Number of cell columns
    #[arg(default_value_t = App::DEFAULT_COLS, value_parser = clap::value_parser!(u16).range(1..))]
    pub cols: u16,

    /// Search algorithm to run
    #[arg(short, long, value_enum, default_value_t = SolverChoice::Bfs)]
    pub solver: SolverChoice,

    /// Start cell as ROW,COL (defaults to the top-left cell)
    #[arg(long, value_parser = parse_coord)]
    pub start: Option<Coord>,

    /// End cell as ROW,COL (defaults to the bottom-right cell)
    #[arg(long, value_parser = parse_coord)]
    pub end: Option<Coord>,

    /// Seed for reproducible mazes
    #[arg(long)]
    pub seed: Option<u64>,

    /// Animation delay after each expanded cell, in milliseconds
    #[arg(long, default_value_t = App::DEFAULT_DELAY_MS)]
    pub delay_ms: u64,

    /// Solve without drawing to the terminal
    #[arg(long)]
    pub no_animate: bool,

    /// Where to write logs
    #[arg(long, default_value = "mazepath.log")]
    pub log_file: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SolverChoice {
    Bfs,
    Dfs,
    Astar,
    Dijkstra,
    /// Run every solver on the same maze, one after another
    All,
}

impl SolverChoice {
    pub fn solvers(self) -> Vec<Solver> {
        match self {
            SolverChoice::Bfs => vec![Solver::Bfs],
            SolverChoice::Dfs => vec![Solver::Dfs],
            SolverChoice::Astar => vec![Solver::AStar],
            SolverChoice::Dijkstra => vec![Solver::Dijkstra],
            SolverChoice::All => Solver::ALL.to_vec(),
        }
    }
}

/// Parses `ROW,COL` into a coordinate.
fn parse_coord(s: &str) -> Result<Coord, String> {
    let (row, col) = s
        .split_once(',')
        .ok_or_else(|| format!("expected ROW,COL, got '{s}'"))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<usize>()
            .map_err(|e| format!("invalid coordinate '{}': {e}", v.trim()))
    };
    Ok((parse(row)?, parse(col)?))
}

pub struct App {
    rows: usize,
    cols: usize,
    solvers: Vec<Solver>,
    start: Coord,
    end: Coord,
    seed: Option<u64>,
    /// Time to wait after each rendered step
    delay: Duration,
    animate: bool,
}

impl Default for App {
    fn default() -> Self {
        Self {
            rows: App::DEFAULT_ROWS as usize,
            cols: App::DEFAULT_COLS as usize,
            solvers: vec![Solver::Bfs],
            start: (0, 0),
            end: (App::DEFAULT_ROWS as usize - 1, App::DEFAULT_COLS as usize - 1),
            seed: None,
            delay: Duration::from_millis(App::DEFAULT_DELAY_MS),
            animate: true,
        }
    }
}

impl App {
    pub const DEFAULT_ROWS: u16 = 25;
    pub const DEFAULT_COLS: u16 = 38;
    pub const DEFAULT_DELAY_MS: u64 = 10;

    pub fn from_cli(cli: &Cli) -> Self {
        let rows = cli.rows as usize;
        let cols = cli.cols as usize;
        Self {
            rows,
            cols,
            solvers: cli.solver.solvers(),
            start: cli.start.unwrap_or((0, 0)),
            end: cli
                .end
                .unwrap_or((rows.saturating_sub(1), cols.saturating_sub(1))),
            seed: cli.seed,
            delay: Duration::from_millis(cli.delay_ms),
            animate: !cli.no_animate,
        }
    }

    /// Generate the maze and place both endpoints.
    pub fn build_maze(&self) -> anyhow::Result<Maze> {
        let mut maze = Maze::new(self.rows, self.cols)?;
        generate_maze(&mut maze, self.seed);
        maze.set_start(self.start).context("invalid start cell")?;
        maze.set_end(self.end).context("invalid end cell")?;
        tracing::info!(
            "Generated {}x{} maze (seed {:?}), solving {:?} -> {:?}",
            self.rows,
            self.cols,
            self.seed,
            self.start,
            self.end
        );
        Ok(maze)
    }

    /// Generate a maze and run every configured solver on it.
    /// Returns the report of each solver that ran.
    pub fn run(&self) -> anyhow::Result<Vec<SolveReport>> {
        let mut maze = self.build_maze()?;

        if self.animate {
            if Renderer::<Stdout>::fits_terminal(&maze)? {
                return self.run_animated(&mut maze);
            }
            tracing::warn!("Terminal too small for the maze, solving without animation");
            eprintln!(
                "{}",
                "Terminal is too small to draw this maze, solving without animation."
                    .with(Color::Yellow)
            );
        }
        Ok(self.run_headless(&mut maze))
    }

    fn run_headless(&self, maze: &mut Maze) -> Vec<SolveReport> {
        self.solvers
            .iter()
            .map(|solver| {
                let report = solver.run(maze, &mut NoopSink);
                log_report(&report);
                report
            })
            .collect()
    }

    fn run_animated(&self, maze: &mut Maze) -> anyhow::Result<Vec<SolveReport>> {
        let mut stdout = std::io::stdout();
        App::setup_terminal(&mut stdout).context("failed to set up terminal")?;
        let result = self.animate_solvers(maze, &mut stdout);
        App::restore_terminal(&mut stdout).context("failed to restore terminal")?;
        result
    }

    fn animate_solvers(
        &self,
        maze: &mut Maze,
        stdout: &mut Stdout,
    ) -> anyhow::Result<Vec<SolveReport>> {
        tracing::info!("Started animation");
        let mut renderer = Renderer::new(stdout, self.delay);
        let mut reports = Vec::with_capacity(self.solvers.len());

        for (i, solver) in self.solvers.iter().enumerate() {
            maze.clear_path();
            renderer.draw(maze)?;
            renderer.status(&format!("{solver} (Esc or q to stop)"))?;

            let report = solver.run(maze, &mut renderer);
            if let Some(err) = renderer.take_error() {
                return Err(err).context("failed to draw solver step");
            }
            log_report(&report);

            renderer.draw(maze)?;
            let is_last = i + 1 == self.solvers.len();
            let prompt = if is_last {
                "Press any key to exit"
            } else {
                "Press any key for the next solver, Esc to stop"
            };
            renderer.status(&format!("{}. {prompt}", summary(&report)))?;
            reports.push(report);

            if Renderer::<Stdout>::wait_for_key()? {
                tracing::info!("Animation stopped by user");
                break;
            }
        }

        tracing::info!("Exiting animation");
        Ok(reports)
    }

    /// Set a panic hook to restore terminal state on panic
    /// This ensures that the terminal is not left in raw mode or alternate screen on panic
    fn set_panic_hook() {
        let hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let _ = App::restore_terminal(&mut std::io::stdout()); // ignore any errors as we are already failing
            hook(panic_info);
        }));
    }

    /// Setup terminal in raw mode and enter alternate screen
    /// Also sets a panic hook to restore terminal on panic
    pub fn setup_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
        terminal::enable_raw_mode()?;
        App::set_panic_hook();
        queue!(
            stdout,
            terminal::EnterAlternateScreen,
            terminal::Clear(ClearType::All),
            cursor::Hide,
            cursor::MoveTo(0, 0)
        )?;
        stdout.flush()?;
        Ok(())
    }

    /// Restore terminal to original state
    /// Leave alternate screen and disable raw mode
    pub fn restore_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
        queue!(stdout, terminal::LeaveAlternateScreen, cursor::Show)?;
        stdout.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }
}

/// One-line description of a solve outcome.
pub fn summary(report: &SolveReport) -> String {
    let outcome = match &report.outcome {
        Ok(path) => format!("path of {} cells", path.len()),
        Err(SolveError::Cancelled) => "cancelled".to_string(),
        Err(err) => err.to_string(),
    };
    format!(
        "{}: {}, {} nodes visited, {:.3}ms",
        report.solver,
        outcome,
        report.nodes_visited,
        report.elapsed.as_secs_f64() * 1000.0
    )
}

fn log_report(report: &SolveReport) {
    match &report.outcome {
        Ok(_) => tracing::info!("{}", summary(report)),
        Err(_) => tracing::warn!("{}", summary(report)),
    }
}
