//! Gameplay orchestration on top of the core data structures.
//!
//! - [`GameEngine`] - command-driven state machine (spawn → active → lock →
//!   clear → score → next spawn, plus pause and game over)
//! - [`PieceBag`] - strict 7-bag piece supply, seedable for determinism
//! - [`Progress`] - score, level, lines, and gravity speed
//! - [`Snapshot`] - immutable copy of the full game state for renderers
//! - [`try_rotate`] - Super Rotation System kick resolution

pub use self::{bag::*, game::*, progress::*, rotation::*, snapshot::*};

mod bag;
mod game;
mod progress;
mod rotation;
mod snapshot;
