use std::collections::{VecDeque, hash_map::Entry};

use super::{Parents, PathResult, SolveError, StepSink, expand, reconstruct_path};
use crate::maze::{Coord, Maze};

/// Breadth-first search. Explores in order of distance from the start, so the
/// first time the end is dequeued the path to it is a shortest one.
pub(super) fn solve_bfs<S: StepSink + ?Sized>(
    maze: &mut Maze,
    start: Coord,
    end: Coord,
    sink: &mut S,
) -> PathResult {
    let mut queue = VecDeque::from([start]);
    let mut parents = Parents::from([(start, None)]);

    while let Some(current) = queue.pop_front() {
        if current == end {
            return Ok(reconstruct_path(maze, &parents, end));
        }

        expand(maze, current, sink)?;

        for neighbor in maze.accessible_neighbors(current) {
            // A parent entry means the neighbor is already queued or expanded
            if let Entry::Vacant(entry) = parents.entry(neighbor) {
                entry.insert(Some(current));
                queue.push_back(neighbor);
            }
        }
    }

    Err(SolveError::NotSolvable)
}
