use rand::Rng;

use crate::shapes::{random_shape, Color, Shape, ShapeId};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

/// A falling tetromino. Knows nothing about the board; every move is
/// checked by `Board::is_valid` before it is committed.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Piece {
    pub shape_id: ShapeId,
    pub shape: Shape,
    pub color: Color,
    /// Top-left corner of the shape's bounding box in grid coordinates.
    pub position: Position,
}

impl Piece {
    /// Spawn orientation, centered horizontally on the top row.
    pub fn spawn(shape_id: ShapeId, grid_width: usize) -> Self {
        let mut piece = Self::new_at(shape_id, 0, 0);
        piece.position.x = (grid_width / 2) as i32 - (piece.shape.cols() / 2) as i32;
        piece
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R, grid_width: usize) -> Self {
        Self::spawn(random_shape(rng), grid_width)
    }

    pub fn new_at(shape_id: ShapeId, x: i32, y: i32) -> Self {
        Self {
            shape_id,
            shape: shape_id.shape(),
            color: shape_id.color(),
            position: Position { x, y },
        }
    }

    pub fn with_shape(mut self, shape: Shape) -> Self {
        self.shape = shape;
        self
    }

    pub fn x(&self) -> i32 {
        self.position.x
    }

    pub fn y(&self) -> i32 {
        self.position.y
    }

    /// The current shape turned a quarter clockwise. The piece itself is
    /// left untouched.
    pub fn rotated_shape(&self) -> Shape {
        self.shape.rotated_clockwise()
    }

    pub fn moved(&self, dx: i32, dy: i32) -> Self {
        Self {
            position: Position {
                x: self.position.x + dx,
                y: self.position.y + dy,
            },
            ..self.clone()
        }
    }

    /// Absolute grid coordinates of every occupied cell.
    pub fn blocks(&self) -> impl Iterator<Item = Position> + '_ {
        self.shape.filled_cells().map(move |(i, j)| Position {
            x: self.position.x + j as i32,
            y: self.position.y + i as i32,
        })
    }
}
