use std::collections::HashMap;

use super::{Parents, PathResult, PriorityFrontier, SolveError, StepSink, expand, reconstruct_path};
use crate::maze::{Coord, Maze};

/// Uniform-cost search: a priority queue ordered by the distance from the start.
///
/// Every step costs 1, so the result has the same length as a BFS path.
pub(super) fn solve_dijkstra<S: StepSink + ?Sized>(
    maze: &mut Maze,
    start: Coord,
    end: Coord,
    sink: &mut S,
) -> PathResult {
    let mut frontier = PriorityFrontier::new();
    let mut parents = Parents::from([(start, None)]);
    // Hash map to track the minimum cost to reach each cell
    let mut dist = HashMap::from([(start, 0usize)]);
    frontier.push(0, start);

    while let Some(current) = frontier.pop() {
        if current == end {
            return Ok(reconstruct_path(maze, &parents, end));
        }

        // Already processed with a lower cost
        if maze[current].is_visited_search() {
            continue;
        }
        expand(maze, current, sink)?;

        let Some(&current_cost) = dist.get(&current) else {
            continue;
        };
        let new_cost = current_cost + 1; // Uniform cost for each step
        for neighbor in maze.accessible_neighbors(current) {
            let is_cheaper = dist
                .get(&neighbor)
                .is_none_or(|&existing_cost| new_cost < existing_cost);
            if is_cheaper {
                dist.insert(neighbor, new_cost);
                parents.insert(neighbor, Some(current));
                frontier.push(new_cost, neighbor);
            }
        }
    }

    Err(SolveError::NotSolvable)
}
