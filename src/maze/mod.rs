pub mod cell;
mod grid;

use rand::Rng;
use thiserror::Error;

pub use cell::{Cell, Coord, Direction};
use grid::Grid;

/// Errors raised when a maze is built or edited with invalid input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MazeError {
    #[error("maze dimensions must be at least 1x1, got {rows}x{cols}")]
    InvalidDimensions { rows: usize, cols: usize },

    #[error("coordinate {coord:?} is outside the {rows}x{cols} maze")]
    OutOfBounds {
        coord: Coord,
        rows: usize,
        cols: usize,
    },

    #[error("start and end cannot both be {0:?}")]
    SameEndpoints(Coord),

    #[error("cells {0:?} and {1:?} are not adjacent")]
    NotAdjacent(Coord, Coord),
}

/// A rectangular maze of `rows x cols` cells with four-connectivity.
pub struct Maze {
    grid: Grid,
    start: Option<Coord>,
    end: Option<Coord>,
}

impl Maze {
    /// Creates a new maze with every wall standing and no endpoints set.
    pub fn new(rows: usize, cols: usize) -> Result<Self, MazeError> {
        if rows == 0 || cols == 0 {
            return Err(MazeError::InvalidDimensions { rows, cols });
        }
        Ok(Maze {
            grid: Grid::new(rows, cols),
            start: None,
            end: None,
        })
    }

    /// Returns the number of cell rows.
    pub fn rows(&self) -> usize {
        self.grid.rows()
    }

    /// Returns the number of cell columns.
    pub fn cols(&self) -> usize {
        self.grid.cols()
    }

    pub fn start(&self) -> Option<Coord> {
        self.start
    }

    pub fn end(&self) -> Option<Coord> {
        self.end
    }

    /// Checks if the given coordinate is within the bounds of the maze.
    pub fn is_in_bounds(&self, coord: Coord) -> bool {
        self.grid.is_in_bounds(coord)
    }

    pub(crate) fn check_bounds(&self, coord: Coord) -> Result<(), MazeError> {
        if self.is_in_bounds(coord) {
            Ok(())
        } else {
            Err(MazeError::OutOfBounds {
                coord,
                rows: self.rows(),
                cols: self.cols(),
            })
        }
    }

    pub fn cell_at(&self, coord: Coord) -> Option<&Cell> {
        self.grid.get(coord)
    }

    /// Iterates over all cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.grid.iter()
    }

    /// Callers must pass an in-bounds coordinate.
    pub(crate) fn cell_mut(&mut self, coord: Coord) -> &mut Cell {
        &mut self.grid[coord]
    }

    /// Regenerates the maze in place with a randomized depth-first carve.
    /// Endpoints are kept as they are.
    pub fn generate<R: Rng>(&mut self, rng: &mut R) {
        crate::generators::recursive_backtrack(self, rng);
    }

    /// Restores every wall and clears every flag.
    pub(crate) fn reset(&mut self) {
        self.grid.iter_mut().for_each(Cell::reset);
    }

    /// Removes the wall shared by two adjacent cells, on both sides.
    ///
    /// Returns `Ok(true)` if a wall was removed and `Ok(false)` if the two cells
    /// were already connected.
    pub fn remove_wall(&mut self, a: Coord, b: Coord) -> Result<bool, MazeError> {
        self.check_bounds(a)?;
        self.check_bounds(b)?;
        let dir = Direction::between(a, b).ok_or(MazeError::NotAdjacent(a, b))?;
        let removed = self.grid[a].open_wall(dir);
        let removed_opposite = self.grid[b].open_wall(dir.opposite());
        debug_assert_eq!(removed, removed_opposite, "walls out of sync at {a:?}/{b:?}");
        Ok(removed)
    }

    /// Returns the in-bounds neighbors of `coord` that are not separated from it
    /// by a wall, in the order top, bottom, left, right.
    pub fn accessible_neighbors(&self, coord: Coord) -> impl Iterator<Item = Coord> + '_ {
        let cell = self.grid.get(coord);
        Direction::NEIGHBOR_ORDER
            .into_iter()
            .filter_map(move |dir| {
                if cell?.has_wall(dir) {
                    return None;
                }
                dir.step(coord)
            })
            .filter(|&c| self.is_in_bounds(c))
    }

    /// In-bounds neighbors not yet reached by the carver, regardless of walls.
    pub(crate) fn unvisited_neighbors(&self, coord: Coord) -> Vec<Coord> {
        Direction::NEIGHBOR_ORDER
            .into_iter()
            .filter_map(|dir| dir.step(coord))
            .filter(|&c| self.grid.get(c).is_some_and(|cell| !cell.is_visited()))
            .collect()
    }

    pub(crate) fn clear_visited(&mut self) {
        self.grid.iter_mut().for_each(|c| c.set_visited(false));
    }

    /// Clears the path and search flags of every cell. Walls are left alone.
    pub fn clear_path(&mut self) {
        self.grid.iter_mut().for_each(Cell::clear_search);
    }

    pub fn set_start(&mut self, coord: Coord) -> Result<(), MazeError> {
        self.check_bounds(coord)?;
        if self.end == Some(coord) {
            return Err(MazeError::SameEndpoints(coord));
        }
        tracing::debug!("[maze] start set to {:?}", coord);
        self.start = Some(coord);
        Ok(())
    }

    pub fn set_end(&mut self, coord: Coord) -> Result<(), MazeError> {
        self.check_bounds(coord)?;
        if self.start == Some(coord) {
            return Err(MazeError::SameEndpoints(coord));
        }
        tracing::debug!("[maze] end set to {:?}", coord);
        self.end = Some(coord);
        Ok(())
    }

    pub fn clear_endpoints(&mut self) {
        self.start = None;
        self.end = None;
    }

    /// Counts the removed walls between pairs of adjacent cells.
    pub fn passage_count(&self) -> usize {
        self.cells()
            .map(|cell| {
                let (row, col) = cell.coord();
                let right = col + 1 < self.cols() && !cell.has_wall(Direction::Right);
                let below = row + 1 < self.rows() && !cell.has_wall(Direction::Bottom);
                right as usize + below as usize
            })
            .sum()
    }

    /// Number of cells expanded by the most recent solve.
    pub fn visited_count(&self) -> usize {
        self.cells().filter(|c| c.is_visited_search()).count()
    }

    /// Number of cells on the most recently reconstructed path.
    pub fn path_len(&self) -> usize {
        self.cells().filter(|c| c.is_path()).count()
    }
}

impl std::ops::Index<Coord> for Maze {
    type Output = Cell;

    fn index(&self, index: Coord) -> &Self::Output {
        &self.grid[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    /// Snapshot of every wall flag, for comparing layouts.
    fn walls(maze: &Maze) -> Vec<[bool; 4]> {
        maze.cells()
            .map(|c| Direction::ALL.map(|d| c.has_wall(d)))
            .collect()
    }

    #[test]
    fn test_new_rejects_empty_dimensions() {
        assert_eq!(
            Maze::new(0, 5).err(),
            Some(MazeError::InvalidDimensions { rows: 0, cols: 5 })
        );
        assert!(Maze::new(4, 0).is_err());
        assert!(Maze::new(1, 1).is_ok());
    }

    #[test]
    fn test_new_maze_is_fully_walled() {
        let maze = Maze::new(3, 4).unwrap();
        assert_eq!(maze.rows(), 3);
        assert_eq!(maze.cols(), 4);
        assert!(maze.cells().all(|c| c.wall_count() == 4));
        assert_eq!(maze.passage_count(), 0);
        assert_eq!(maze.start(), None);
        assert_eq!(maze.end(), None);
    }

    #[test]
    fn test_maze_indexing() {
        let maze = Maze::new(5, 5).unwrap();
        assert_eq!(maze[(2, 3)].coord(), (2, 3));
        assert_eq!(maze.cell_at((4, 4)).map(Cell::coord), Some((4, 4)));
        assert!(maze.cell_at((5, 0)).is_none());
    }

    #[test]
    fn test_remove_wall_is_symmetric() {
        let mut maze = Maze::new(3, 3).unwrap();
        assert_eq!(maze.remove_wall((1, 1), (1, 2)), Ok(true));
        assert!(!maze[(1, 1)].has_wall(Direction::Right));
        assert!(!maze[(1, 2)].has_wall(Direction::Left));
        // Removing the same wall again reports that nothing changed
        assert_eq!(maze.remove_wall((1, 2), (1, 1)), Ok(false));

        assert_eq!(maze.remove_wall((1, 1), (0, 1)), Ok(true));
        assert!(!maze[(1, 1)].has_wall(Direction::Top));
        assert!(!maze[(0, 1)].has_wall(Direction::Bottom));
        assert_eq!(maze.passage_count(), 2);
    }

    #[test]
    fn test_remove_wall_rejects_bad_pairs() {
        let mut maze = Maze::new(3, 3).unwrap();
        assert_eq!(
            maze.remove_wall((0, 0), (1, 1)),
            Err(MazeError::NotAdjacent((0, 0), (1, 1)))
        );
        assert_eq!(
            maze.remove_wall((0, 0), (0, 0)),
            Err(MazeError::NotAdjacent((0, 0), (0, 0)))
        );
        assert!(matches!(
            maze.remove_wall((2, 2), (2, 3)),
            Err(MazeError::OutOfBounds { coord: (2, 3), .. })
        ));
        assert_eq!(maze.passage_count(), 0);
    }

    #[test]
    fn test_accessible_neighbors_follow_open_walls() {
        let mut maze = Maze::new(3, 3).unwrap();
        assert_eq!(maze.accessible_neighbors((1, 1)).count(), 0);

        maze.remove_wall((1, 1), (1, 2)).unwrap();
        maze.remove_wall((1, 1), (0, 1)).unwrap();
        maze.remove_wall((1, 1), (2, 1)).unwrap();
        maze.remove_wall((1, 1), (1, 0)).unwrap();
        // Fixed order: top, bottom, left, right
        assert_eq!(
            maze.accessible_neighbors((1, 1)).collect::<Vec<_>>(),
            vec![(0, 1), (2, 1), (1, 0), (1, 2)]
        );
        assert_eq!(
            maze.accessible_neighbors((0, 1)).collect::<Vec<_>>(),
            vec![(1, 1)]
        );
        assert_eq!(maze.accessible_neighbors((7, 7)).count(), 0);
    }

    #[test]
    fn test_unvisited_neighbors_ignore_walls() {
        let mut maze = Maze::new(2, 2).unwrap();
        assert_eq!(maze.unvisited_neighbors((0, 0)), vec![(1, 0), (0, 1)]);
        maze.cell_mut((1, 0)).set_visited(true);
        assert_eq!(maze.unvisited_neighbors((0, 0)), vec![(0, 1)]);
    }

    #[test]
    fn test_set_endpoints_validates() {
        let mut maze = Maze::new(4, 4).unwrap();
        assert!(matches!(
            maze.set_start((4, 0)),
            Err(MazeError::OutOfBounds { .. })
        ));
        assert_eq!(maze.set_start((0, 0)), Ok(()));
        assert_eq!(
            maze.set_end((0, 0)),
            Err(MazeError::SameEndpoints((0, 0)))
        );
        assert_eq!(maze.set_end((3, 3)), Ok(()));
        assert_eq!(
            maze.set_start((3, 3)),
            Err(MazeError::SameEndpoints((3, 3)))
        );
        // The failed call leaves the previous start in place
        assert_eq!(maze.start(), Some((0, 0)));
        assert_eq!(maze.end(), Some((3, 3)));

        maze.clear_endpoints();
        assert_eq!((maze.start(), maze.end()), (None, None));
    }

    #[test]
    fn test_clear_path_is_idempotent_and_keeps_walls() {
        let mut maze = Maze::new(6, 7).unwrap();
        maze.generate(&mut StdRng::seed_from_u64(3));
        maze.cell_mut((0, 0)).mark_path();
        maze.cell_mut((2, 2)).mark_expanded();
        let before = walls(&maze);

        maze.clear_path();
        let once = walls(&maze);
        maze.clear_path();

        assert_eq!(before, once);
        assert_eq!(once, walls(&maze));
        assert_eq!(maze.visited_count(), 0);
        assert_eq!(maze.path_len(), 0);
        assert!(maze.cells().all(|c| !c.is_visited()));
    }

    #[test]
    fn test_reset_restores_all_walls() {
        let mut maze = Maze::new(3, 3).unwrap();
        maze.remove_wall((0, 0), (0, 1)).unwrap();
        maze.cell_mut((0, 0)).mark_path();
        maze.reset();
        assert_eq!(maze.passage_count(), 0);
        assert_eq!(maze.path_len(), 0);
    }
}
