use std::{
    cmp::Reverse,
    collections::{BinaryHeap, HashMap},
    ops::ControlFlow,
    time::{Duration, Instant},
};

use thiserror::Error;

mod astar;
mod bfs;
mod dfs;
mod dijkstra;
pub mod sink;

use crate::maze::{Coord, Maze, MazeError};
use astar::solve_astar;
use bfs::solve_bfs;
use dfs::solve_dfs;
use dijkstra::solve_dijkstra;
pub use sink::{ChannelSink, FlagSink, NoopSink, StepEvent, StepSink};

/// Ways a solve can end without a path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolveError {
    #[error("start and end must both be set before solving")]
    EndpointsUnset,

    #[error("invalid endpoints: {0}")]
    InvalidBounds(#[from] MazeError),

    #[error("no path exists between the start and end cells")]
    NotSolvable,

    #[error("solve was cancelled")]
    Cancelled,
}

/// Either the path from start to end (both inclusive) or why there is none.
pub type PathResult = Result<Vec<Coord>, SolveError>;

/// Parent links recorded during a search, `None` marks the start cell.
type Parents = HashMap<Coord, Option<Coord>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Solver {
    Bfs,
    Dfs,
    AStar,
    Dijkstra,
}

impl std::fmt::Display for Solver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Solver::Bfs => write!(f, "Breadth-First Search (BFS)"),
            Solver::Dfs => write!(f, "Depth-First Search (DFS)"),
            Solver::AStar => write!(f, "A* Search"),
            Solver::Dijkstra => write!(f, "Dijkstra's Algorithm"),
        }
    }
}

/// Outcome of [`Solver::run`] together with the statistics of the run.
#[derive(Debug, Clone)]
pub struct SolveReport {
    pub solver: Solver,
    pub outcome: PathResult,
    /// Cells expanded during the solve.
    pub nodes_visited: usize,
    /// Cells marked as part of the path, zero when no path was found.
    pub path_length: usize,
    pub elapsed: Duration,
}

impl Solver {
    pub const ALL: [Solver; 4] = [Solver::Bfs, Solver::Dfs, Solver::AStar, Solver::Dijkstra];

    /// Whether the solver always returns a shortest path.
    pub fn is_optimal(&self) -> bool {
        !matches!(self, Solver::Dfs)
    }

    /// Solves between the endpoints stored on the maze.
    ///
    /// Nothing is mutated if either endpoint is missing.
    pub fn solve<S: StepSink + ?Sized>(&self, maze: &mut Maze, sink: &mut S) -> PathResult {
        let (Some(start), Some(end)) = (maze.start(), maze.end()) else {
            return Err(SolveError::EndpointsUnset);
        };
        self.solve_between(maze, start, end, sink)
    }

    /// Solves between explicit endpoints, which may coincide.
    ///
    /// Previous path and search flags are cleared first. On success every cell
    /// of the returned path is marked as part of the path.
    pub fn solve_between<S: StepSink + ?Sized>(
        &self,
        maze: &mut Maze,
        start: Coord,
        end: Coord,
        sink: &mut S,
    ) -> PathResult {
        maze.check_bounds(start)?;
        maze.check_bounds(end)?;
        maze.clear_path();

        tracing::debug!("[{}] solving {:?} -> {:?}", self, start, end);
        let result = match self {
            Solver::Bfs => solve_bfs(maze, start, end, sink),
            Solver::Dfs => solve_dfs(maze, start, end, sink),
            Solver::AStar => solve_astar(maze, start, end, sink),
            Solver::Dijkstra => solve_dijkstra(maze, start, end, sink),
        };
        match &result {
            Ok(path) => tracing::debug!("[{}] path of {} cells found", self, path.len()),
            Err(err) => tracing::debug!("[{}] {}", self, err),
        }
        result
    }

    /// Like [`Solver::solve`], but also measures the run.
    pub fn run<S: StepSink + ?Sized>(&self, maze: &mut Maze, sink: &mut S) -> SolveReport {
        let started = Instant::now();
        let outcome = self.solve(maze, sink);
        let elapsed = started.elapsed();
        SolveReport {
            solver: *self,
            outcome,
            nodes_visited: maze.visited_count(),
            path_length: maze.path_len(),
            elapsed,
        }
    }
}

/// Marks `coord` as expanded and reports it to the sink.
fn expand<S: StepSink + ?Sized>(
    maze: &mut Maze,
    coord: Coord,
    sink: &mut S,
) -> Result<(), SolveError> {
    maze.cell_mut(coord).mark_expanded();
    match sink.on_step(maze, coord) {
        ControlFlow::Continue(()) => Ok(()),
        ControlFlow::Break(()) => Err(SolveError::Cancelled),
    }
}

/// Walks back from `end` through the parent links, marking each cell as part
/// of the path, and returns the path in start-to-end order.
fn reconstruct_path(maze: &mut Maze, parents: &Parents, end: Coord) -> Vec<Coord> {
    let mut path = Vec::new();
    let mut current = Some(end);
    while let Some(coord) = current {
        maze.cell_mut(coord).mark_path();
        path.push(coord);
        current = parents.get(&coord).copied().flatten();
    }
    path.reverse();
    path
}

/// Min-priority queue of cells. Equal priorities pop in insertion order.
struct PriorityFrontier {
    heap: BinaryHeap<Reverse<(usize, usize, Coord)>>,
    seq: usize,
}

impl PriorityFrontier {
    fn new() -> Self {
        PriorityFrontier {
            heap: BinaryHeap::new(),
            seq: 0,
        }
    }

    fn push(&mut self, priority: usize, coord: Coord) {
        self.heap.push(Reverse((priority, self.seq, coord)));
        self.seq += 1;
    }

    fn pop(&mut self) -> Option<Coord> {
        self.heap.pop().map(|Reverse((_, _, coord))| coord)
    }
}
