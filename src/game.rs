use std::time::Duration;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::board::{score_for, Board, CellState, LockOutcome};
use crate::config::Config;
use crate::error::ConfigError;
use crate::piece::Piece;
use crate::shapes::{random_shape, ShapeId};

pub const LINES_PER_LEVEL: u32 = 10;

// ============================================================================
// Types
// ============================================================================

/// Discrete player intents, one per key press.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum InputEvent {
    Quit,
    TogglePause,
    /// Fresh board and counters; the sound setting carries over.
    Reset,
    ToggleSound,
    MoveLeft,
    MoveRight,
    SoftDrop,
    Rotate,
}

/// Whether the front-end should keep running after a step.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum GameEvent {
    PieceMoved,
    PieceRotated,
    PieceLocked,
    LinesCleared(u32),
    Paused,
    Unpaused,
    SoundToggled(bool),
    GameRestarted,
    GameOver,
}

// ============================================================================
// Piece Provider Trait
// ============================================================================

pub trait PieceProvider {
    fn next_shape(&mut self) -> ShapeId;
}

/// Uniform selection from a seedable generator.
pub struct RandomPieceProvider {
    rng: StdRng,
}

impl RandomPieceProvider {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }
}

impl PieceProvider for RandomPieceProvider {
    fn next_shape(&mut self) -> ShapeId {
        random_shape(&mut self.rng)
    }
}

pub struct SequencePieceProvider {
    pieces: Vec<ShapeId>,
    index: usize,
}

impl SequencePieceProvider {
    pub fn new(pieces: Vec<ShapeId>) -> Self {
        Self { pieces, index: 0 }
    }
}

impl PieceProvider for SequencePieceProvider {
    fn next_shape(&mut self) -> ShapeId {
        let piece = self
            .pieces
            .get(self.index % self.pieces.len().max(1))
            .copied()
            .unwrap_or(ShapeId::O);
        self.index += 1;
        piece
    }
}

// ============================================================================
// Snapshot
// ============================================================================

/// Read-only view handed to the renderer after each step.
#[derive(Clone, Copy, Debug)]
pub struct Snapshot<'a> {
    pub board: &'a Board,
    pub current: &'a Piece,
    pub next: &'a Piece,
    pub score: u32,
    pub lines_cleared: u32,
    pub level: u32,
    pub paused: bool,
    pub sound_on: bool,
    pub game_over: bool,
}

impl Snapshot<'_> {
    /// Locked cells with the current piece drawn on top. Cells of the piece
    /// that are still above the grid are left out.
    pub fn visual_grid(&self) -> Vec<Vec<CellState>> {
        let mut grid = self.board.rows().to_vec();
        for block in self.current.blocks() {
            if block.x < 0 || block.y < 0 {
                continue;
            }
            if let Some(cell) = grid
                .get_mut(block.y as usize)
                .and_then(|row| row.get_mut(block.x as usize))
            {
                *cell = CellState::Filled(self.current.color);
            }
        }
        grid
    }
}

// ============================================================================
// Game
// ============================================================================

/// One play session: the board, the falling piece and the one after it,
/// plus counters, flags and the fall timer.
pub struct Game {
    pub board: Board,
    pub current_piece: Piece,
    pub next_piece: Piece,
    pub score: u32,
    pub lines_cleared: u32,
    pub paused: bool,
    pub sound_on: bool,
    pub game_over: bool,
    pub fall_accumulator: Duration,
    config: Config,
    piece_provider: Box<dyn PieceProvider>,
    events: Vec<GameEvent>,
}

impl Game {
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        let provider = RandomPieceProvider::new(config.seed);
        Self::with_provider(config, Box::new(provider))
    }

    pub fn with_provider(
        config: Config,
        mut provider: Box<dyn PieceProvider>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let current_piece = Piece::spawn(provider.next_shape(), config.grid_width);
        let next_piece = Piece::spawn(provider.next_shape(), config.grid_width);

        Ok(Self {
            board: Board::new(config.grid_width, config.grid_height),
            current_piece,
            next_piece,
            score: 0,
            lines_cleared: 0,
            paused: false,
            sound_on: config.sound_on,
            game_over: false,
            fall_accumulator: Duration::ZERO,
            config,
            piece_provider: provider,
            events: vec![GameEvent::GameRestarted],
        })
    }

    pub fn fall_interval(&self) -> Duration {
        self.config.fall_interval
    }

    /// Informational only; the fall interval does not depend on it.
    pub fn level(&self) -> u32 {
        self.lines_cleared / LINES_PER_LEVEL + 1
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            board: &self.board,
            current: &self.current_piece,
            next: &self.next_piece,
            score: self.score,
            lines_cleared: self.lines_cleared,
            level: self.level(),
            paused: self.paused,
            sound_on: self.sound_on,
            game_over: self.game_over,
        }
    }

    /// Advances the session by one frame: bank the elapsed time, apply the
    /// drained inputs in order, then run gravity if the fall timer is due.
    /// Stops early and returns `Flow::Quit` on a quit request.
    pub fn tick(&mut self, elapsed: Duration, inputs: &[InputEvent]) -> Flow {
        self.fall_accumulator += elapsed;

        for &input in inputs {
            if self.handle_input(input) == Flow::Quit {
                return Flow::Quit;
            }
        }

        if !self.paused && !self.game_over && self.fall_accumulator >= self.config.fall_interval {
            self.fall();
            self.fall_accumulator = Duration::ZERO;
        }

        Flow::Continue
    }

    pub fn handle_input(&mut self, input: InputEvent) -> Flow {
        match input {
            InputEvent::Quit => return Flow::Quit,
            InputEvent::TogglePause => self.toggle_pause(),
            InputEvent::Reset => self.reset(),
            InputEvent::ToggleSound => self.toggle_sound(),
            InputEvent::MoveLeft => {
                self.move_piece(-1, 0);
            }
            InputEvent::MoveRight => {
                self.move_piece(1, 0);
            }
            InputEvent::SoftDrop => {
                self.move_piece(0, 1);
            }
            InputEvent::Rotate => {
                self.rotate_piece();
            }
        }
        Flow::Continue
    }

    fn accepts_moves(&self) -> bool {
        !self.paused && !self.game_over
    }

    pub fn move_piece(&mut self, dx: i32, dy: i32) -> bool {
        if !self.accepts_moves() {
            return false;
        }
        let moved = self.current_piece.moved(dx, dy);
        if self.board.is_valid(&moved.shape, moved.x(), moved.y()) {
            self.current_piece = moved;
            self.events.push(GameEvent::PieceMoved);
            true
        } else {
            false
        }
    }

    /// Turns the piece clockwise in place. No kicks: a rotation that
    /// collides at the current position is dropped.
    pub fn rotate_piece(&mut self) -> bool {
        if !self.accepts_moves() {
            return false;
        }
        let rotated = self.current_piece.rotated_shape();
        if self
            .board
            .is_valid(&rotated, self.current_piece.x(), self.current_piece.y())
        {
            self.current_piece.shape = rotated;
            self.events.push(GameEvent::PieceRotated);
            true
        } else {
            false
        }
    }

    /// One gravity step: drop a row, or lock when the piece is resting.
    pub fn fall(&mut self) {
        let piece = &self.current_piece;
        if self.board.is_valid(&piece.shape, piece.x(), piece.y() + 1) {
            self.current_piece.position.y += 1;
        } else {
            self.lock_and_spawn();
        }
    }

    fn lock_and_spawn(&mut self) {
        if self.board.lock(&self.current_piece) == LockOutcome::Overflow {
            self.end_session();
            return;
        }
        self.events.push(GameEvent::PieceLocked);

        let lines = self.board.clear_full_lines();
        if lines > 0 {
            self.score = self.score.saturating_add(score_for(lines));
            self.lines_cleared = self.lines_cleared.saturating_add(lines);
            self.events.push(GameEvent::LinesCleared(lines));
        }

        self.spawn_next_piece();
    }

    /// Promotes the preview piece and draws a new one. Ends the session if
    /// the promoted piece already overlaps the stack.
    pub fn spawn_next_piece(&mut self) {
        let upcoming = Piece::spawn(self.piece_provider.next_shape(), self.config.grid_width);
        self.current_piece = std::mem::replace(&mut self.next_piece, upcoming);
        debug!("spawned {:?}", self.current_piece.shape_id);

        let piece = &self.current_piece;
        if !self.board.is_valid(&piece.shape, piece.x(), piece.y()) {
            self.end_session();
        }
    }

    fn end_session(&mut self) {
        self.game_over = true;
        self.events.push(GameEvent::GameOver);
        info!(
            "game over: score {} after {} line(s)",
            self.score, self.lines_cleared
        );
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        self.events.push(if self.paused {
            GameEvent::Paused
        } else {
            GameEvent::Unpaused
        });
    }

    pub fn toggle_sound(&mut self) {
        self.sound_on = !self.sound_on;
        self.events.push(GameEvent::SoundToggled(self.sound_on));
    }

    /// Starts a fresh session on the same configuration. The sound setting
    /// is kept.
    pub fn reset(&mut self) {
        self.board = Board::new(self.config.grid_width, self.config.grid_height);
        self.score = 0;
        self.lines_cleared = 0;
        self.paused = false;
        self.game_over = false;
        self.fall_accumulator = Duration::ZERO;

        self.current_piece = Piece::spawn(self.piece_provider.next_shape(), self.config.grid_width);
        self.next_piece = Piece::spawn(self.piece_provider.next_shape(), self.config.grid_width);

        self.events.push(GameEvent::GameRestarted);
        info!("session reset");
    }

    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
