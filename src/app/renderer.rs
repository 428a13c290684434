use std::{fmt, io::Write, ops::ControlFlow, time::Duration};

use crossterm::{
    cursor,
    event::{self, KeyCode, KeyModifiers},
    queue,
    style::{self, Attribute, Color, Stylize},
    terminal::{self, ClearType},
};

use crate::{
    maze::{Cell, Coord, Direction, Maze},
    solvers::StepSink,
};

/// What a single terminal tile shows. Cells and the walls between them each
/// take one tile, so an `r x c` maze is drawn as `(2r + 1) x (2c + 1)` tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Wall,
    Open,
    Visited,
    Path,
    Start,
    End,
}

impl Tile {
    /// The width of each tile when rendered, in character widths.
    pub const WIDTH: u16 = 2;
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let styled_symbol = match self {
            Tile::Wall => "██".with(Color::DarkGrey),
            Tile::Open => "  ".with(Color::Reset),
            Tile::Visited => "··".with(Color::Blue),
            Tile::Path => "██".with(Color::Yellow),
            Tile::Start => "🟩".with(Color::Green),
            Tile::End => "🟥".with(Color::Red),
        };

        #[cfg(debug_assertions)]
        {
            use unicode_width::UnicodeWidthStr;
            assert_eq!(
                styled_symbol.content().width(),
                Tile::WIDTH as usize,
                "Each tile must occupy exactly two character widths."
            );
        }

        write!(f, "{}", styled_symbol)
    }
}

/// Number of tile rows and columns needed to draw `maze`.
pub fn tile_dims(maze: &Maze) -> (usize, usize) {
    (maze.rows() * 2 + 1, maze.cols() * 2 + 1)
}

fn cell_tile(maze: &Maze, cell: &Cell) -> Tile {
    if maze.start() == Some(cell.coord()) {
        Tile::Start
    } else if maze.end() == Some(cell.coord()) {
        Tile::End
    } else if cell.is_path() {
        Tile::Path
    } else if cell.is_visited_search() {
        Tile::Visited
    } else {
        Tile::Open
    }
}

/// The tile between two adjacent cells `a` and `b`, given the side of `a` they share.
fn passage_tile(maze: &Maze, a: Coord, side: Direction) -> Tile {
    let Some(b) = side.step(a).filter(|&b| maze.is_in_bounds(b)) else {
        return Tile::Wall;
    };
    let (a, b) = (&maze[a], &maze[b]);
    if a.has_wall(side) {
        Tile::Wall
    } else if a.is_path() && b.is_path() {
        Tile::Path
    } else if (a.is_visited_search() || a.is_path()) && (b.is_visited_search() || b.is_path()) {
        Tile::Visited
    } else {
        Tile::Open
    }
}

/// Tile at tile-row `y`, tile-column `x`.
pub fn tile_at(maze: &Maze, y: usize, x: usize) -> Tile {
    match (y % 2, x % 2) {
        // Corners between cells
        (0, 0) => Tile::Wall,
        (1, 1) => cell_tile(maze, &maze[((y - 1) / 2, (x - 1) / 2)]),
        // Vertical wall to the left of cell (row, x / 2)
        (1, 0) => {
            let row = (y - 1) / 2;
            match x {
                0 => Tile::Wall,
                _ => passage_tile(maze, (row, x / 2 - 1), Direction::Right),
            }
        }
        // Horizontal wall above cell (y / 2, col)
        _ => {
            let col = (x - 1) / 2;
            match y {
                0 => Tile::Wall,
                _ => passage_tile(maze, (y / 2 - 1, col), Direction::Bottom),
            }
        }
    }
}

/// Draws a maze into a terminal and animates solver steps.
///
/// Used as a [`StepSink`]: each expansion redraws the tiles around the cell,
/// checks for Esc, `q` or Ctrl-C, then waits for the configured delay.
pub struct Renderer<W: Write> {
    out: W,
    /// Time to wait after each rendered step
    delay: Duration,
    /// Row below the maze where status messages go
    status_row: u16,
    /// First I/O error hit while acting as a step sink
    error: Option<std::io::Error>,
}

impl<W: Write> Renderer<W> {
    pub fn new(out: W, delay: Duration) -> Self {
        Self {
            out,
            delay,
            status_row: 0,
            error: None,
        }
    }

    /// Returns the I/O error that interrupted the last solve, if any.
    pub fn take_error(&mut self) -> Option<std::io::Error> {
        self.error.take()
    }

    /// Check if the terminal is large enough to draw `maze` plus a status line.
    pub fn fits_terminal(maze: &Maze) -> std::io::Result<bool> {
        let (term_width, term_height) = terminal::size()?;
        let (tile_rows, tile_cols) = tile_dims(maze);
        Ok((term_width as usize) >= tile_cols * Tile::WIDTH as usize
            && (term_height as usize) > tile_rows)
    }

    /// Redraw the whole maze.
    pub fn draw(&mut self, maze: &Maze) -> std::io::Result<()> {
        let (tile_rows, tile_cols) = tile_dims(maze);
        queue!(self.out, terminal::Clear(ClearType::All), cursor::MoveTo(0, 0))?;
        for y in 0..tile_rows {
            for x in 0..tile_cols {
                queue!(self.out, style::Print(tile_at(maze, y, x)))?;
            }
            queue!(self.out, style::Print("\r\n"))?;
        }
        self.status_row = tile_rows as u16;
        self.out.flush()
    }

    /// Redraw the tile of `coord` and the four passages around it.
    fn draw_around(&mut self, maze: &Maze, coord: Coord) -> std::io::Result<()> {
        let (y, x) = (coord.0 * 2 + 1, coord.1 * 2 + 1);
        for (ty, tx) in [(y, x), (y - 1, x), (y + 1, x), (y, x - 1), (y, x + 1)] {
            queue!(
                self.out,
                cursor::MoveTo(tx as u16 * Tile::WIDTH, ty as u16),
                style::Print(tile_at(maze, ty, tx))
            )?;
        }
        self.out.flush()
    }

    /// Print a message on the line below the maze.
    pub fn status(&mut self, msg: &str) -> std::io::Result<()> {
        queue!(
            self.out,
            cursor::MoveTo(0, self.status_row),
            terminal::Clear(ClearType::FromCursorDown),
            style::PrintStyledContent(msg.with(Color::Green).attribute(Attribute::Bold))
        )?;
        self.out.flush()
    }

    /// Drain pending key presses without blocking.
    /// Returns `true` if the user asked to stop.
    fn cancel_requested() -> std::io::Result<bool> {
        while event::poll(Duration::ZERO)? {
            if let event::Event::Key(key) = event::read()? {
                if key.kind == event::KeyEventKind::Press && is_cancel_key(key) {
                    tracing::debug!("[render] cancel key pressed");
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }

    /// Block until a key is pressed. Returns `true` if it was a cancel key.
    pub fn wait_for_key() -> std::io::Result<bool> {
        loop {
            if let event::Event::Key(key) = event::read()? {
                if key.kind == event::KeyEventKind::Press {
                    return Ok(is_cancel_key(key));
                }
            }
        }
    }
}

fn is_cancel_key(key: event::KeyEvent) -> bool {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

impl<W: Write> StepSink for Renderer<W> {
    fn on_step(&mut self, maze: &Maze, expanded: Coord) -> ControlFlow<()> {
        let step = self
            .draw_around(maze, expanded)
            .and_then(|()| Self::cancel_requested());
        match step {
            Ok(false) => {
                std::thread::sleep(self.delay);
                ControlFlow::Continue(())
            }
            Ok(true) => ControlFlow::Break(()),
            Err(err) => {
                tracing::error!("[render] failed to draw step at {:?}: {}", expanded, err);
                self.error = Some(err);
                ControlFlow::Break(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Plain-text rendering of the tile grid, one char per tile.
    fn sketch(maze: &Maze) -> Vec<String> {
        let (rows, cols) = tile_dims(maze);
        (0..rows)
            .map(|y| {
                (0..cols)
                    .map(|x| match tile_at(maze, y, x) {
                        Tile::Wall => '#',
                        Tile::Open => ' ',
                        Tile::Visited => '.',
                        Tile::Path => '*',
                        Tile::Start => 'S',
                        Tile::End => 'E',
                    })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_tile_layout_follows_walls() {
        let mut maze = Maze::new(2, 2).unwrap();
        maze.remove_wall((0, 0), (0, 1)).unwrap();
        maze.remove_wall((0, 1), (1, 1)).unwrap();
        maze.remove_wall((1, 1), (1, 0)).unwrap();
        assert_eq!(
            sketch(&maze),
            vec!["#####", "#   #", "### #", "#   #", "#####"]
        );
    }

    #[test]
    fn test_tiles_show_search_state() {
        let mut maze = Maze::new(2, 2).unwrap();
        maze.remove_wall((0, 0), (0, 1)).unwrap();
        maze.remove_wall((0, 1), (1, 1)).unwrap();
        maze.remove_wall((1, 1), (1, 0)).unwrap();
        maze.set_start((0, 0)).unwrap();
        maze.set_end((1, 0)).unwrap();
        crate::solvers::Solver::Bfs
            .solve(&mut maze, &mut crate::solvers::NoopSink)
            .unwrap();
        assert_eq!(
            sketch(&maze),
            vec!["#####", "#S**#", "###*#", "#E**#", "#####"]
        );
    }

    #[test]
    fn test_renderer_draw_writes_every_row() {
        let maze = Maze::new(3, 4).unwrap();
        let mut renderer = Renderer::new(Vec::new(), Duration::ZERO);
        renderer.draw(&maze).unwrap();
        let out = String::from_utf8(renderer.out.clone()).unwrap();
        assert_eq!(out.matches("\r\n").count(), 7);
        assert_eq!(renderer.status_row, 7);
    }
}
