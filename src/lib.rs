pub mod audio;
pub mod board;
pub mod config;
pub mod error;
pub mod game;
pub mod input;
pub mod piece;
pub mod shapes;

pub use board::{Board, CellState, LockOutcome};
pub use config::Config;
pub use error::ConfigError;
pub use game::{Flow, Game, GameEvent, InputEvent, Snapshot};
pub use piece::Piece;
pub use shapes::{Color, Shape, ShapeId};
