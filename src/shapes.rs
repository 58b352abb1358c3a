use rand::Rng;

// ============================================================================
// Colors
// ============================================================================

/// Opaque RGB triple. The simulation only compares it; the renderer paints it.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const CYAN: Color = Color::rgb(0, 255, 255);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    pub const MAGENTA: Color = Color::rgb(255, 0, 255);
    pub const ORANGE: Color = Color::rgb(255, 165, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const RED: Color = Color::rgb(255, 0, 0);
}

// ============================================================================
// Shape matrix
// ============================================================================

/// Rectangular boolean matrix, row-major. Rotating a non-square shape swaps
/// its dimensions, so the size is carried alongside the buffer.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Shape {
    rows: usize,
    cols: usize,
    cells: Vec<bool>,
}

impl Shape {
    /// Builds a shape from rows of `1`/`0` flags. Ragged input is padded
    /// with empty cells to the widest row.
    pub fn from_rows(rows: &[&[u8]]) -> Self {
        let cols = rows.iter().map(|r| r.len()).max().unwrap_or(0);
        let mut cells = vec![false; rows.len() * cols];
        for (i, row) in rows.iter().enumerate() {
            for (j, &flag) in row.iter().enumerate() {
                cells[i * cols + j] = flag != 0;
            }
        }
        Self {
            rows: rows.len(),
            cols,
            cells,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_filled(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols && self.cells[row * self.cols + col]
    }

    /// Number of occupied cells.
    pub fn area(&self) -> usize {
        self.cells.iter().filter(|c| **c).count()
    }

    /// Occupied cells as `(row, col)` pairs, top to bottom, left to right.
    pub fn filled_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let cols = self.cols;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, filled)| **filled)
            .map(move |(idx, _)| (idx / cols, idx % cols))
    }

    /// Returns a new matrix turned a quarter clockwise: output cell
    /// `(i, j)` takes input cell `(rows - 1 - j, i)`.
    pub fn rotated_clockwise(&self) -> Shape {
        let rows = self.cols;
        let cols = self.rows;
        let mut cells = vec![false; rows * cols];
        for i in 0..rows {
            for j in 0..cols {
                cells[i * cols + j] = self.is_filled(self.rows - 1 - j, i);
            }
        }
        Shape { rows, cols, cells }
    }
}

// ============================================================================
// Catalog
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum ShapeId {
    I,
    O,
    T,
    L,
    J,
    S,
    Z,
}

impl ShapeId {
    /// Catalog order, indices 0 through 6.
    pub const ALL: [ShapeId; 7] = [
        ShapeId::I,
        ShapeId::O,
        ShapeId::T,
        ShapeId::L,
        ShapeId::J,
        ShapeId::S,
        ShapeId::Z,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn color(self) -> Color {
        match self {
            ShapeId::I => Color::CYAN,
            ShapeId::O => Color::YELLOW,
            ShapeId::T => Color::MAGENTA,
            ShapeId::L => Color::ORANGE,
            ShapeId::J => Color::BLUE,
            ShapeId::S => Color::GREEN,
            ShapeId::Z => Color::RED,
        }
    }

    /// A fresh copy of the catalog matrix in its spawn orientation.
    pub fn shape(self) -> Shape {
        match self {
            ShapeId::I => Shape::from_rows(&[&[1, 1, 1, 1]]),
            ShapeId::O => Shape::from_rows(&[&[1, 1], &[1, 1]]),
            ShapeId::T => Shape::from_rows(&[&[1, 1, 1], &[0, 1, 0]]),
            ShapeId::L => Shape::from_rows(&[&[1, 1, 1], &[1, 0, 0]]),
            ShapeId::J => Shape::from_rows(&[&[1, 1, 1], &[0, 0, 1]]),
            ShapeId::S => Shape::from_rows(&[&[1, 1, 0], &[0, 1, 1]]),
            ShapeId::Z => Shape::from_rows(&[&[0, 1, 1], &[1, 1, 0]]),
        }
    }
}

/// Uniform draw over the seven catalog entries.
pub fn random_shape<R: Rng + ?Sized>(rng: &mut R) -> ShapeId {
    ShapeId::ALL[rng.gen_range(0..ShapeId::ALL.len())]
}
