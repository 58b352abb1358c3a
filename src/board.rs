use log::debug;

use crate::piece::Piece;
use crate::shapes::{Color, Shape};

pub const POINTS_PER_LINE: u32 = 100;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CellState {
    Empty,
    Filled(Color),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LockOutcome {
    Locked,
    /// Part of the piece was still above row 0 when it came to rest.
    Overflow,
}

/// Grid of locked cells, row 0 at the top. Dimensions never change after
/// construction.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Board {
    width: usize,
    height: usize,
    cells: Vec<Vec<CellState>>,
}

impl Board {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![vec![CellState::Empty; width]; height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn rows(&self) -> &[Vec<CellState>] {
        &self.cells
    }

    pub fn get(&self, x: usize, y: usize) -> Option<CellState> {
        self.cells.get(y).and_then(|row| row.get(x)).copied()
    }

    /// Writes one cell. Out-of-range coordinates are ignored.
    pub fn set(&mut self, x: usize, y: usize, cell: CellState) {
        if let Some(slot) = self.cells.get_mut(y).and_then(|row| row.get_mut(x)) {
            *slot = cell;
        }
    }

    /// Whether `shape` fits with its top-left corner at `(x, y)`.
    ///
    /// Rows above the grid (`y + i < 0`) are allowed and never collide, so a
    /// piece may hang over the top edge. Columns must stay inside the walls
    /// and rows must stay above the floor.
    pub fn is_valid(&self, shape: &Shape, x: i32, y: i32) -> bool {
        for (i, j) in shape.filled_cells() {
            let col = x + j as i32;
            let row = y + i as i32;
            if col < 0 || col >= self.width as i32 {
                return false;
            }
            if row >= self.height as i32 {
                return false;
            }
            if row >= 0 && self.cells[row as usize][col as usize] != CellState::Empty {
                return false;
            }
        }
        true
    }

    /// Copies the piece into the grid in its color. Stops at the first
    /// cell above row 0 and reports `Overflow`.
    pub fn lock(&mut self, piece: &Piece) -> LockOutcome {
        for block in piece.blocks() {
            if block.y < 0 {
                debug!("lock overflow at column {}", block.x);
                return LockOutcome::Overflow;
            }
            debug_assert!(block.x >= 0, "locked piece left of the grid");
            self.set(
                block.x as usize,
                block.y as usize,
                CellState::Filled(piece.color),
            );
        }
        LockOutcome::Locked
    }

    /// Removes every full row, bottom to top, dropping the rows above it by
    /// one. The scan stays on the same index after a removal because a new
    /// row has moved into it.
    pub fn clear_full_lines(&mut self) -> u32 {
        let mut cleared = 0;
        let mut y = self.height;

        while y > 0 {
            let row = y - 1;
            if self.is_row_complete(row) {
                self.cells.remove(row);
                self.cells.insert(0, vec![CellState::Empty; self.width]);
                cleared += 1;
            } else {
                y -= 1;
            }
        }

        if cleared > 0 {
            debug!("cleared {} line(s)", cleared);
        }
        cleared
    }

    pub fn is_row_complete(&self, y: usize) -> bool {
        self.cells
            .get(y)
            .map_or(false, |row| row.iter().all(|cell| *cell != CellState::Empty))
    }

    pub fn filled_count_in_row(&self, y: usize) -> usize {
        self.cells.get(y).map_or(0, |row| {
            row.iter().filter(|cell| **cell != CellState::Empty).count()
        })
    }

    pub fn total_filled_cells(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|cell| **cell != CellState::Empty)
            .count()
    }
}

/// Points for clearing `lines` rows in a single lock: 100 × n².
pub fn score_for(lines: u32) -> u32 {
    POINTS_PER_LINE * lines * lines
}

// ============================================================================
// Test Helpers
// ============================================================================

pub mod test_helpers {
    use super::*;

    pub const MARKER: Color = Color::MAGENTA;

    pub fn empty_board() -> Board {
        Board::new(10, 20)
    }

    pub fn fill_row(board: &mut Board, y: usize) {
        for x in 0..board.width() {
            board.set(x, y, CellState::Filled(MARKER));
        }
    }

    pub fn fill_row_with_gap(board: &mut Board, y: usize, gap_x: usize) {
        for x in 0..board.width() {
            if x != gap_x {
                board.set(x, y, CellState::Filled(MARKER));
            }
        }
    }
}
