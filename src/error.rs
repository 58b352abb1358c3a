use thiserror::Error;

use crate::shapes::ShapeId;

/// Reasons a session refuses to start.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("grid width must be at least 1")]
    ZeroWidth,
    #[error("grid height must be at least 1")]
    ZeroHeight,
    #[error("grid dimension {0} exceeds the maximum of {max}", max = crate::config::MAX_GRID_DIM)]
    GridTooLarge(usize),
    #[error("fall interval must be greater than zero")]
    ZeroFallInterval,
    #[error("shape {0:?} has no occupied cells")]
    EmptyShape(ShapeId),
    #[error("shape {shape:?} is {shape_width} cells wide but the grid is only {grid_width}")]
    ShapeTooWide {
        shape: ShapeId,
        shape_width: usize,
        grid_width: usize,
    },
}
