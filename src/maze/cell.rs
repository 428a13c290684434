/// Row-major grid coordinate: `(row, col)`.
pub type Coord = (usize, usize);

/// One of the four sides of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Top,
    Right,
    Bottom,
    Left,
}

impl Direction {
    /// All sides, in wall storage order.
    pub const ALL: [Direction; 4] = [
        Direction::Top,
        Direction::Right,
        Direction::Bottom,
        Direction::Left,
    ];

    /// Order in which neighbors are reported, both during carving and to the solvers.
    pub const NEIGHBOR_ORDER: [Direction; 4] = [
        Direction::Top,
        Direction::Bottom,
        Direction::Left,
        Direction::Right,
    ];

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Top => Direction::Bottom,
            Direction::Right => Direction::Left,
            Direction::Bottom => Direction::Top,
            Direction::Left => Direction::Right,
        }
    }

    /// Returns the coordinate one step away from `coord` in this direction.
    /// Returns `None` if the step would underflow; the upper bound is left to the caller.
    pub fn step(self, coord: Coord) -> Option<Coord> {
        let (row, col) = coord;
        match self {
            Direction::Top => row.checked_sub(1).map(|r| (r, col)),
            Direction::Bottom => row.checked_add(1).map(|r| (r, col)),
            Direction::Left => col.checked_sub(1).map(|c| (row, c)),
            Direction::Right => col.checked_add(1).map(|c| (row, c)),
        }
    }

    /// Returns the direction leading from `from` to `to` if the two are 4-adjacent.
    pub fn between(from: Coord, to: Coord) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|dir| dir.step(from) == Some(to))
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// A single maze cell with its wall flags and search state.
///
/// Cells are owned by [`Maze`](super::Maze). Walls can only be opened through
/// [`Maze::remove_wall`](super::Maze::remove_wall), which keeps both sides of a
/// shared wall consistent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    row: usize,
    col: usize,
    /// Indexed by [`Direction`], `true` means the wall is present.
    walls: [bool; 4],
    /// Only meaningful while a maze is being carved.
    visited: bool,
    is_path: bool,
    is_visited_search: bool,
}

impl Cell {
    pub(super) fn new(row: usize, col: usize) -> Self {
        Cell {
            row,
            col,
            walls: [true; 4],
            visited: false,
            is_path: false,
            is_visited_search: false,
        }
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn col(&self) -> usize {
        self.col
    }

    pub fn coord(&self) -> Coord {
        (self.row, self.col)
    }

    pub fn has_wall(&self, dir: Direction) -> bool {
        self.walls[dir.index()]
    }

    /// Number of walls still standing around this cell.
    pub fn wall_count(&self) -> usize {
        self.walls.iter().filter(|&&w| w).count()
    }

    pub fn is_visited(&self) -> bool {
        self.visited
    }

    /// Whether the cell is on the most recently reconstructed path.
    pub fn is_path(&self) -> bool {
        self.is_path
    }

    /// Whether the cell was expanded during the most recent solve.
    pub fn is_visited_search(&self) -> bool {
        self.is_visited_search
    }

    /// Restores all four walls and clears every flag.
    pub(super) fn reset(&mut self) {
        self.walls = [true; 4];
        self.clear_search();
    }

    pub(super) fn clear_search(&mut self) {
        self.visited = false;
        self.is_path = false;
        self.is_visited_search = false;
    }

    /// Opens one side of this cell. Returns `true` if a wall was standing there.
    pub(super) fn open_wall(&mut self, dir: Direction) -> bool {
        std::mem::replace(&mut self.walls[dir.index()], false)
    }

    pub(crate) fn set_visited(&mut self, visited: bool) {
        self.visited = visited;
    }

    pub(crate) fn mark_path(&mut self) {
        self.is_path = true;
    }

    pub(crate) fn mark_expanded(&mut self) {
        self.is_visited_search = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_cell_is_fully_walled() {
        let cell = Cell::new(2, 3);
        assert_eq!(cell.coord(), (2, 3));
        assert!(Direction::ALL.iter().all(|&d| cell.has_wall(d)));
        assert_eq!(cell.wall_count(), 4);
        assert!(!cell.is_visited() && !cell.is_path() && !cell.is_visited_search());
    }

    #[test]
    fn test_open_wall_reports_previous_state() {
        let mut cell = Cell::new(0, 0);
        assert!(cell.open_wall(Direction::Right));
        assert!(!cell.open_wall(Direction::Right));
        assert!(!cell.has_wall(Direction::Right));
        assert_eq!(cell.wall_count(), 3);
    }

    #[test]
    fn test_reset_restores_walls_and_flags() {
        let mut cell = Cell::new(1, 1);
        cell.open_wall(Direction::Top);
        cell.mark_path();
        cell.mark_expanded();
        cell.set_visited(true);
        cell.reset();
        assert_eq!(cell, Cell::new(1, 1));
    }

    #[test]
    fn test_direction_step_and_between() {
        assert_eq!(Direction::Top.step((0, 0)), None);
        assert_eq!(Direction::Left.step((3, 0)), None);
        assert_eq!(Direction::Bottom.step((0, 0)), Some((1, 0)));
        assert_eq!(Direction::Right.step((2, 4)), Some((2, 5)));
        assert_eq!(Direction::between((1, 1), (0, 1)), Some(Direction::Top));
        assert_eq!(Direction::between((1, 1), (1, 2)), Some(Direction::Right));
        assert_eq!(Direction::between((1, 1), (2, 2)), None);
        assert_eq!(Direction::between((1, 1), (1, 1)), None);
        for dir in Direction::ALL {
            assert_eq!(dir.opposite().opposite(), dir);
        }
    }
}
