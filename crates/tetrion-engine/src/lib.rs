//! Command-driven Tetris game engine.
//!
//! The engine owns all game state (board, active piece, piece supply, hold
//! slot, score) and is advanced only by external calls: discrete commands
//! (move, rotate, drop, hold, pause) and periodic [`GameEngine::tick`] calls
//! carrying a caller-supplied monotonic timestamp. It performs no scheduling,
//! rendering, or input handling of its own.
//!
//! Renderers consume [`GameEngine::snapshot`], an immutable copy of the full
//! game state taken between commands.
//!
//! # Example
//!
//! ```
//! use tetrion_engine::GameEngine;
//!
//! let mut game = GameEngine::new();
//!
//! game.move_piece(-1, 0);
//! game.rotate(true);
//! game.hard_drop();
//!
//! let snapshot = game.snapshot();
//! assert!(!snapshot.game_over);
//! ```

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;
