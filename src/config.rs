use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::error::ConfigError;
use crate::shapes::ShapeId;

pub const DEFAULT_GRID_WIDTH: usize = 10;
pub const DEFAULT_GRID_HEIGHT: usize = 20;
pub const DEFAULT_FALL_MS: u64 = 500;
pub const MAX_GRID_DIM: usize = 1024;

/// Session settings, fixed for the whole run. `reset` reuses them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub grid_width: usize,
    pub grid_height: usize,
    pub fall_interval: Duration,
    /// Seed for piece selection; `None` draws one from the OS.
    pub seed: Option<u64>,
    pub sound_on: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grid_width: DEFAULT_GRID_WIDTH,
            grid_height: DEFAULT_GRID_HEIGHT,
            fall_interval: Duration::from_millis(DEFAULT_FALL_MS),
            seed: None,
            sound_on: true,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_width == 0 {
            return Err(ConfigError::ZeroWidth);
        }
        if self.grid_height == 0 {
            return Err(ConfigError::ZeroHeight);
        }
        for dim in [self.grid_width, self.grid_height] {
            if dim > MAX_GRID_DIM {
                return Err(ConfigError::GridTooLarge(dim));
            }
        }
        if self.fall_interval.is_zero() {
            return Err(ConfigError::ZeroFallInterval);
        }
        for id in ShapeId::ALL {
            let shape = id.shape();
            if shape.area() == 0 {
                return Err(ConfigError::EmptyShape(id));
            }
            if shape.cols() > self.grid_width {
                return Err(ConfigError::ShapeTooWide {
                    shape: id,
                    shape_width: shape.cols(),
                    grid_width: self.grid_width,
                });
            }
        }
        Ok(())
    }
}

/// Command line for the terminal front-end.
#[derive(Parser, Debug, Clone)]
#[command(name = "falling-blocks", version, about = "Falling-block puzzle game for the terminal")]
pub struct Cli {
    /// Number of grid columns
    #[arg(long, env = "FALLING_BLOCKS_WIDTH", default_value_t = DEFAULT_GRID_WIDTH)]
    pub width: usize,

    /// Number of grid rows
    #[arg(long, env = "FALLING_BLOCKS_HEIGHT", default_value_t = DEFAULT_GRID_HEIGHT)]
    pub height: usize,

    /// Milliseconds between automatic one-row drops
    #[arg(long = "fall-ms", env = "FALLING_BLOCKS_FALL_MS", default_value_t = DEFAULT_FALL_MS)]
    pub fall_ms: u64,

    /// Seed for piece selection
    #[arg(long, env = "FALLING_BLOCKS_SEED")]
    pub seed: Option<u64>,

    /// Start with sound off
    #[arg(long)]
    pub mute: bool,

    /// Write log records to this file
    #[arg(long = "log-file")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    pub fn to_config(&self) -> Config {
        Config {
            grid_width: self.width,
            grid_height: self.height,
            fall_interval: Duration::from_millis(self.fall_ms),
            seed: self.seed,
            sound_on: !self.mute,
        }
    }
}
