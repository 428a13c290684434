use rand::Rng;

use crate::maze::Maze;

/// Randomized depth-first carving (recursive backtracker) from cell (0, 0).
///
/// Every wall is restored first, so the result never depends on the previous
/// layout. The carved passages form a spanning tree over the grid: every cell
/// is reachable and there is exactly one simple path between any two cells.
pub fn recursive_backtrack<R: Rng>(maze: &mut Maze, rng: &mut R) {
    maze.reset();

    let start = (0, 0);
    maze.cell_mut(start).set_visited(true);

    // The stack keeps the carved cells that may still have unvisited neighbors
    let mut stack = vec![start];
    let mut carved = 0usize;

    while let Some(&cell) = stack.last() {
        let neighbors = maze.unvisited_neighbors(cell);

        if neighbors.is_empty() {
            // Dead end, backtrack
            stack.pop();
            continue;
        }

        let neighbor = neighbors[rng.random_range(0..neighbors.len())];
        if let Err(err) = maze.remove_wall(cell, neighbor) {
            // Neighbors come from the maze itself, so this is a bug
            tracing::error!("[generate] failed to carve {:?} -> {:?}: {}", cell, neighbor, err);
            break;
        }
        carved += 1;
        maze.cell_mut(neighbor).set_visited(true);
        stack.push(neighbor);
    }

    // The visited flag is only meaningful while carving
    maze.clear_visited();

    tracing::debug!(
        "[generate] carved {} passages in a {}x{} maze",
        carved,
        maze.rows(),
        maze.cols()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::Direction;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn test_recursive_backtrack_carves_spanning_tree() {
        let mut maze = Maze::new(7, 9).unwrap();
        recursive_backtrack(&mut maze, &mut StdRng::seed_from_u64(0));
        assert_eq!(maze.passage_count(), 7 * 9 - 1);
        // Every cell has at least one opening
        assert!(maze.cells().all(|c| c.wall_count() < 4));
        assert!(maze.cells().all(|c| !c.is_visited()));
    }

    #[test]
    fn test_boundary_walls_stay_intact() {
        let mut maze = Maze::new(5, 4).unwrap();
        recursive_backtrack(&mut maze, &mut StdRng::seed_from_u64(11));
        for cell in maze.cells() {
            let (row, col) = cell.coord();
            if row == 0 {
                assert!(cell.has_wall(Direction::Top));
            }
            if row == maze.rows() - 1 {
                assert!(cell.has_wall(Direction::Bottom));
            }
            if col == 0 {
                assert!(cell.has_wall(Direction::Left));
            }
            if col == maze.cols() - 1 {
                assert!(cell.has_wall(Direction::Right));
            }
        }
    }

    #[test]
    fn test_single_cell_maze() {
        let mut maze = Maze::new(1, 1).unwrap();
        recursive_backtrack(&mut maze, &mut StdRng::seed_from_u64(1));
        assert_eq!(maze.passage_count(), 0);
        assert_eq!(maze[(0, 0)].wall_count(), 4);
    }

    #[test]
    fn test_same_seed_same_layout() {
        let layout = |seed| {
            let mut maze = Maze::new(6, 6).unwrap();
            crate::generators::generate_maze(&mut maze, Some(seed));
            maze.cells()
                .map(|c| Direction::ALL.map(|d| c.has_wall(d)))
                .collect::<Vec<_>>()
        };
        assert_eq!(layout(42), layout(42));
    }

    #[test]
    fn test_generation_keeps_endpoints() {
        let mut maze = Maze::new(4, 4).unwrap();
        maze.set_start((0, 0)).unwrap();
        maze.set_end((3, 3)).unwrap();
        recursive_backtrack(&mut maze, &mut StdRng::seed_from_u64(5));
        assert_eq!(maze.start(), Some((0, 0)));
        assert_eq!(maze.end(), Some((3, 3)));
    }
}
