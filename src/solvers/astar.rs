use super::{Parents, PathResult, PriorityFrontier, SolveError, StepSink, expand, reconstruct_path};
use crate::maze::{Coord, Maze};
use std::collections::HashMap;

/// Manhattan distance, admissible and consistent on a unit-cost 4-connected grid.
pub(super) fn manhattan(a: Coord, b: Coord) -> usize {
    a.0.abs_diff(b.0) + a.1.abs_diff(b.1)
}

/// A* search ordered by `g + h`, with `g` the steps taken from the start and
/// `h` the Manhattan distance to the end.
///
/// Cells can be queued several times; entries for cells that were already
/// expanded are skipped when popped.
pub(super) fn solve_astar<S: StepSink + ?Sized>(
    maze: &mut Maze,
    start: Coord,
    end: Coord,
    sink: &mut S,
) -> PathResult {
    let mut frontier = PriorityFrontier::new();
    let mut parents = Parents::from([(start, None)]);
    let mut g_score = HashMap::from([(start, 0usize)]);
    frontier.push(manhattan(start, end), start);

    while let Some(current) = frontier.pop() {
        if current == end {
            return Ok(reconstruct_path(maze, &parents, end));
        }

        // Stale entry
        if maze[current].is_visited_search() {
            continue;
        }
        expand(maze, current, sink)?;

        let Some(&current_g) = g_score.get(&current) else {
            continue;
        };
        let tentative_g = current_g + 1;
        for neighbor in maze.accessible_neighbors(current) {
            let improves = g_score
                .get(&neighbor)
                .is_none_or(|&known| tentative_g < known);
            if improves {
                g_score.insert(neighbor, tentative_g);
                parents.insert(neighbor, Some(current));
                frontier.push(tentative_g + manhattan(neighbor, end), neighbor);
            }
        }
    }

    Err(SolveError::NotSolvable)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solvers::{NoopSink, bfs::solve_bfs};

    /// A fully open grid: every internal wall removed.
    fn open_grid(rows: usize, cols: usize) -> Maze {
        let mut maze = Maze::new(rows, cols).unwrap();
        for row in 0..rows {
            for col in 0..cols {
                if col + 1 < cols {
                    maze.remove_wall((row, col), (row, col + 1)).unwrap();
                }
                if row + 1 < rows {
                    maze.remove_wall((row, col), (row + 1, col)).unwrap();
                }
            }
        }
        maze
    }

    #[test]
    fn test_manhattan() {
        assert_eq!(manhattan((0, 0), (0, 0)), 0);
        assert_eq!(manhattan((1, 5), (4, 2)), 6);
        assert_eq!(manhattan((4, 2), (1, 5)), 6);
    }

    #[test]
    fn test_astar_is_optimal_on_open_grid() {
        let mut maze = open_grid(6, 6);
        let path = solve_astar(&mut maze, (0, 0), (5, 5), &mut NoopSink).unwrap();
        assert_eq!(path.len(), 11);
        assert_eq!(path.first(), Some(&(0, 0)));
        assert_eq!(path.last(), Some(&(5, 5)));
    }

    #[test]
    fn test_astar_expands_fewer_cells_than_bfs() {
        let mut maze = open_grid(8, 8);
        solve_astar(&mut maze, (0, 0), (0, 7), &mut NoopSink).unwrap();
        let astar_visited = maze.visited_count();

        maze.clear_path();
        solve_bfs(&mut maze, (0, 0), (0, 7), &mut NoopSink).unwrap();
        let bfs_visited = maze.visited_count();

        // Straight line toward the goal, h is exact
        assert_eq!(astar_visited, 7);
        assert!(astar_visited < bfs_visited);
    }
}
