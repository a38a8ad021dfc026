use serde::{Deserialize, Serialize};

use crate::shape::Shape;

pub const WIDTH: usize = 10;
pub const HEIGHT: usize = 20;
pub const POINTS_PER_LINE: u32 = 100;

#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
pub enum Cell {
    #[default]
    Empty,
    Filled,
}

impl Cell {
    pub fn is_filled(self) -> bool {
        self == Cell::Filled
    }
}

/// Locked cells plus the running score.
///
/// Row 0 is the top of the well. Every query and mutation takes a shape and the
/// grid coordinate of its top-left corner.
#[derive(Clone, Debug)]
pub struct Board {
    cells: [[Cell; WIDTH]; HEIGHT],
    score: u32,
    lines_cleared: u32,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub fn new() -> Self {
        Self {
            cells: [[Cell::Empty; WIDTH]; HEIGHT],
            score: 0,
            lines_cleared: 0,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Total rows removed since the last reset.
    pub fn lines_cleared(&self) -> u32 {
        self.lines_cleared
    }

    pub fn rows(&self) -> &[[Cell; WIDTH]; HEIGHT] {
        &self.cells
    }

    /// # Panics
    ///
    /// Panics if `x >= WIDTH` or `y >= HEIGHT`; use [`Board::get`] when the coordinates may be off the grid.
    pub fn cell(&self, x: usize, y: usize) -> Cell {
        self.cells[y][x]
    }

    /// `None` outside the grid.
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        let row = self.cells.get(usize::try_from(y).ok()?)?;
        row.get(usize::try_from(x).ok()?).copied()
    }

    /// # Panics
    ///
    /// Panics if `x >= WIDTH` or `y >= HEIGHT`.
    pub fn set_cell(&mut self, x: usize, y: usize, cell: Cell) {
        self.cells[y][x] = cell;
    }

    /// Cells above row 0 never collide; sides and floor always do.
    pub fn is_valid_placement(&self, shape: &Shape, x: i32, y: i32) -> bool {
        shape.cells().all(|(dx, dy)| {
            let cx = x + dx;
            let cy = y + dy;
            if cx < 0 || cx >= WIDTH as i32 || cy >= HEIGHT as i32 {
                return false;
            }
            cy < 0 || !self.cells[cy as usize][cx as usize].is_filled()
        })
    }

    /// Writes the shape into the grid. The placement must already have been
    /// validated; cells that fall outside the grid are dropped.
    pub fn merge(&mut self, shape: &Shape, x: i32, y: i32) {
        for (dx, dy) in shape.cells() {
            let cx = x + dx;
            let cy = y + dy;
            if (0..WIDTH as i32).contains(&cx) && (0..HEIGHT as i32).contains(&cy) {
                self.cells[cy as usize][cx as usize] = Cell::Filled;
            }
        }
    }

    /// Removes every full row, shifting the rows above it down, and returns how
    /// many rows were removed. Score is left to [`Board::credit_lines`].
    pub fn clear_full_lines(&mut self) -> usize {
        let mut cleared = 0;
        let mut y = HEIGHT;
        while y > 0 {
            let row = y - 1;
            if self.cells[row].iter().all(|c| c.is_filled()) {
                for pull in (1..=row).rev() {
                    self.cells[pull] = self.cells[pull - 1];
                }
                self.cells[0] = [Cell::Empty; WIDTH];
                cleared += 1;
                // the row pulled into `row` still needs checking
            } else {
                y -= 1;
            }
        }
        cleared
    }

    /// Adds `lines * POINTS_PER_LINE` to the score and returns the delta.
    pub fn credit_lines(&mut self, lines: usize) -> u32 {
        if lines == 0 {
            return 0;
        }
        let delta = lines as u32 * POINTS_PER_LINE;
        self.score = self.score.saturating_add(delta);
        self.lines_cleared = self.lines_cleared.saturating_add(lines as u32);
        delta
    }

    pub fn reset(&mut self) {
        *self = Board::new();
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().flatten().all(|c| !c.is_filled())
    }
}
