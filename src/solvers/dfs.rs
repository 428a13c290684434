use std::collections::hash_map::Entry;

use super::{Parents, PathResult, SolveError, StepSink, expand, reconstruct_path};
use crate::maze::{Coord, Maze};

/// Depth-first search with an explicit stack.
///
/// Neighbors are pushed in the maze's fixed order (top, bottom, left, right),
/// so the most recently pushed one, usually the right neighbor, is explored
/// first. Any path found is accepted; it is not necessarily the shortest.
pub(super) fn solve_dfs<S: StepSink + ?Sized>(
    maze: &mut Maze,
    start: Coord,
    end: Coord,
    sink: &mut S,
) -> PathResult {
    let mut stack = vec![start];
    let mut parents = Parents::from([(start, None)]);

    while let Some(current) = stack.pop() {
        if current == end {
            return Ok(reconstruct_path(maze, &parents, end));
        }

        if maze[current].is_visited_search() {
            continue;
        }
        expand(maze, current, sink)?;

        for neighbor in maze.accessible_neighbors(current) {
            if let Entry::Vacant(entry) = parents.entry(neighbor) {
                entry.insert(Some(current));
                stack.push(neighbor);
            }
        }
    }

    Err(SolveError::NotSolvable)
}
