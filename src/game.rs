use crate::grid::Grid;
use crate::tetromino::{Tetromino, TetrominoKind};

// ============================================================================
// Configuration
// ============================================================================

pub const DEFAULT_WIDTH: usize = 10;
pub const DEFAULT_HEIGHT: usize = 20;

/// Points awarded for every row removed.
pub const LINE_CLEAR_BONUS: u32 = 10;

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("playfield must be at least 1x1, got {width}x{height}")]
pub struct InvalidSizeError {
    pub width: usize,
    pub height: usize,
}

/// The falling piece and the playfield position of its top-left corner.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ActivePiece {
    pub piece: Tetromino,
    pub x: i32,
    pub y: i32,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Phase {
    Falling(ActivePiece),
    GameOver,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum GameEvent {
    PieceMoved,
    PieceRotated,
    PieceDropped,
    PieceLocked,
    LinesCleared(u32),
    GameOver,
    GameRestarted,
}

/// A player or timer input, for drivers that queue or forward commands.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
    MoveLeft,
    MoveRight,
    RotateCw,
    RotateCcw,
    Drop,
    Step,
}

// ============================================================================
// Piece Provider Trait
// ============================================================================

pub trait PieceProvider: Send {
    fn next_piece(&mut self) -> TetrominoKind;
}

/// Uniform random draw, the default supply.
#[derive(Debug, Default)]
pub struct RandomPieceProvider;

impl PieceProvider for RandomPieceProvider {
    fn next_piece(&mut self) -> TetrominoKind {
        TetrominoKind::random()
    }
}

/// Cycles through a fixed sequence.
#[derive(Debug)]
pub struct SequencePieceProvider {
    pieces: Vec<TetrominoKind>,
    index: usize,
}

impl SequencePieceProvider {
    /// # Panics
    ///
    /// Panics if `pieces` is empty.
    pub fn new(pieces: Vec<TetrominoKind>) -> Self {
        assert!(!pieces.is_empty(), "piece sequence must not be empty");
        Self { pieces, index: 0 }
    }
}

impl PieceProvider for SequencePieceProvider {
    fn next_piece(&mut self) -> TetrominoKind {
        let piece = self.pieces[self.index % self.pieces.len()];
        self.index += 1;
        piece
    }
}

// ============================================================================
// Game
// ============================================================================

/// A single match.
///
/// The engine does no locking of its own: a driver that shares a `Game`
/// between threads must serialize every call (see [`crate::session`]).
pub struct Game {
    playfield: Grid,
    phase: Phase,
    score: u32,
    lines_cleared: u32,
    piece_provider: Box<dyn PieceProvider>,
    events: Vec<GameEvent>,
}

impl Game {
    /// # Panics
    ///
    /// Panics if `width` or `height` is zero.
    pub fn new(width: usize, height: usize) -> Self {
        match Self::try_new(width, height) {
            Ok(game) => game,
            Err(err) => panic!("{err}"),
        }
    }

    pub fn try_new(width: usize, height: usize) -> Result<Self, InvalidSizeError> {
        Self::with_provider(width, height, Box::new(RandomPieceProvider))
    }

    /// Starts a match drawing pieces from `provider`.
    ///
    /// The first piece is placed immediately; if it does not fit the match
    /// starts over.
    pub fn with_provider(
        width: usize,
        height: usize,
        provider: Box<dyn PieceProvider>,
    ) -> Result<Self, InvalidSizeError> {
        if width == 0 || height == 0 {
            return Err(InvalidSizeError { width, height });
        }
        let mut game = Self {
            playfield: Grid::new(width, height),
            phase: Phase::GameOver,
            score: 0,
            lines_cleared: 0,
            piece_provider: provider,
            events: Vec::new(),
        };
        game.spawn_next_piece();
        Ok(game)
    }

    /// Resumes from a prepared playfield with `active` as the falling piece.
    pub fn from_parts(
        playfield: Grid,
        active: ActivePiece,
        provider: Box<dyn PieceProvider>,
    ) -> Self {
        let phase = if playfield.fits(active.piece.shape(), active.x, active.y) {
            Phase::Falling(active)
        } else {
            Phase::GameOver
        };
        Self {
            playfield,
            phase,
            score: 0,
            lines_cleared: 0,
            piece_provider: provider,
            events: Vec::new(),
        }
    }

    pub fn width(&self) -> usize {
        self.playfield.width()
    }

    pub fn height(&self) -> usize {
        self.playfield.height()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lines_cleared(&self) -> u32 {
        self.lines_cleared
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, Phase::GameOver)
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// The falling piece, `None` once the game is over.
    pub fn active(&self) -> Option<&ActivePiece> {
        match &self.phase {
            Phase::Falling(active) => Some(active),
            Phase::GameOver => None,
        }
    }

    /// Locked cells only, without the falling piece.
    pub fn playfield(&self) -> &Grid {
        &self.playfield
    }

    /// Returns a fresh copy of the playfield with the falling piece stamped on it.
    pub fn current_state(&self) -> Grid {
        let mut state = self.playfield.clone();
        if let Phase::Falling(active) = &self.phase {
            active.piece.shape().copy_into(&mut state, active.x, active.y);
        }
        state
    }

    /// Takes and clears all pending events
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

// ============================================================================
// Game Logic
// ============================================================================

impl Game {
    /// Advances the simulation by one row.
    ///
    /// The piece falls if there is room below it; otherwise it is locked,
    /// full rows are cleared and the next piece spawns. Returns whether the
    /// game is over.
    pub fn step(&mut self) -> bool {
        let Phase::Falling(active) = &mut self.phase else {
            return true;
        };
        if self
            .playfield
            .fits(active.piece.shape(), active.x, active.y + 1)
        {
            active.y += 1;
            return false;
        }

        self.lock_piece();
        self.clear_lines();
        self.spawn_next_piece();
        self.is_over()
    }

    pub fn move_left(&mut self) -> bool {
        self.shift(-1)
    }

    pub fn move_right(&mut self) -> bool {
        self.shift(1)
    }

    pub fn rotate_cw(&mut self) -> bool {
        self.rotate(true)
    }

    pub fn rotate_ccw(&mut self) -> bool {
        self.rotate(false)
    }

    /// Moves the piece straight down onto whatever is below it. The piece is
    /// not locked until the next [`step`](Game::step).
    pub fn drop_piece(&mut self) -> bool {
        let Phase::Falling(active) = &mut self.phase else {
            return false;
        };
        let start = active.y;
        while self
            .playfield
            .fits(active.piece.shape(), active.x, active.y + 1)
        {
            active.y += 1;
        }
        let moved = active.y != start;
        if moved {
            self.events.push(GameEvent::PieceDropped);
        }
        moved
    }

    /// Runs `command`. Returns whether it had any effect; for
    /// [`Command::Step`] that means the match was still running.
    pub fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::MoveLeft => self.move_left(),
            Command::MoveRight => self.move_right(),
            Command::RotateCw => self.rotate_cw(),
            Command::RotateCcw => self.rotate_ccw(),
            Command::Drop => self.drop_piece(),
            Command::Step => {
                let running = !self.is_over();
                self.step();
                running
            }
        }
    }

    /// Empties the playfield, resets the counters and spawns a new piece.
    pub fn restart(&mut self) {
        let (width, height) = (self.width(), self.height());
        self.playfield.fill(0, 0, width, height, 0);
        self.score = 0;
        self.lines_cleared = 0;
        self.events.clear();
        self.events.push(GameEvent::GameRestarted);
        self.spawn_next_piece();
    }

    fn shift(&mut self, dx: i32) -> bool {
        let Phase::Falling(active) = &mut self.phase else {
            return false;
        };
        if !self
            .playfield
            .fits(active.piece.shape(), active.x + dx, active.y)
        {
            return false;
        }
        active.x += dx;
        self.events.push(GameEvent::PieceMoved);
        true
    }

    fn rotate(&mut self, clockwise: bool) -> bool {
        let Phase::Falling(active) = &mut self.phase else {
            return false;
        };
        let rotated = if clockwise {
            active.piece.rotated_cw()
        } else {
            active.piece.rotated_ccw()
        };
        if !self.playfield.fits(rotated.shape(), active.x, active.y) {
            return false;
        }
        active.piece = rotated;
        self.events.push(GameEvent::PieceRotated);
        true
    }

    fn lock_piece(&mut self) {
        if let Phase::Falling(active) = &self.phase {
            active
                .piece
                .shape()
                .copy_into(&mut self.playfield, active.x, active.y);
            self.events.push(GameEvent::PieceLocked);
        }
    }

    /// Scans bottom to top. A full row is removed and the same index is
    /// checked again, since the row above has just moved into it.
    fn clear_lines(&mut self) -> u32 {
        let mut cleared = 0;
        for y in (0..self.playfield.height()).rev() {
            while self.playfield.is_row_full(y) {
                self.playfield.remove_row(y);
                cleared += 1;
            }
        }

        if cleared > 0 {
            self.score += cleared * LINE_CLEAR_BONUS;
            self.lines_cleared += cleared;
            self.events.push(GameEvent::LinesCleared(cleared));
        }
        cleared
    }

    fn spawn_next_piece(&mut self) {
        let piece = Tetromino::canonical(self.piece_provider.next_piece()).clone();
        let x = (self.playfield.width() as i32 - piece.width() as i32) / 2;

        if self.playfield.fits(piece.shape(), x, 0) {
            self.phase = Phase::Falling(ActivePiece { piece, x, y: 0 });
        } else {
            self.phase = Phase::GameOver;
            self.events.push(GameEvent::GameOver);
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}

// ============================================================================
// Test Helpers
// ============================================================================

pub mod test_helpers {
    use super::*;

    /// Value used for pre-filled cells; distinct from any piece id under test.
    pub const FILLER: u8 = TetrominoKind::T as u8;

    pub fn empty_playfield() -> Grid {
        Grid::new(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }

    pub fn fill_row(grid: &mut Grid, y: usize) {
        grid.fill(0, y as i32, grid.width(), 1, FILLER);
    }

    pub fn fill_row_with_gap(grid: &mut Grid, y: usize, gap_x: usize) {
        fill_row(grid, y);
        grid.set(gap_x, y, 0);
    }

    /// A game on `playfield` with a canonical `kind` at `(x, y)` and `next`
    /// supplying every following piece.
    pub fn game_with(
        playfield: Grid,
        kind: TetrominoKind,
        x: i32,
        y: i32,
        next: Vec<TetrominoKind>,
    ) -> Game {
        let active = ActivePiece {
            piece: Tetromino::canonical(kind).clone(),
            x,
            y,
        };
        Game::from_parts(playfield, active, Box::new(SequencePieceProvider::new(next)))
    }

    pub fn position(game: &Game) -> (i32, i32) {
        let active = game.active().expect("game should still be running");
        (active.x, active.y)
    }
}
