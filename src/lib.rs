//! Falling-block puzzle engine.
//!
//! The engine is a small synchronous state machine: a [`Game`] owns a
//! playfield [`Grid`] and the falling [`Tetromino`], advances one row per
//! [`Game::step`] and answers player commands. Rendering and timing belong to
//! the caller; [`session`] has the pieces a threaded driver needs.

pub mod game;
pub mod grid;
pub mod session;
pub mod tetromino;

pub use game::{
    ActivePiece, Command, Game, GameEvent, InvalidSizeError, Phase, PieceProvider,
    RandomPieceProvider, SequencePieceProvider,
};
pub use grid::Grid;
pub use session::{SharedGame, Snapshot, Ticker};
pub use tetromino::{color_of, Tetromino, TetrominoKind};
