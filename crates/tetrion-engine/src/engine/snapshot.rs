use serde::Serialize;

use crate::core::{
    board::{Board, Cell},
    piece::{PieceKind, Shape},
};

use super::game::NEXT_QUEUE_LEN;

/// The active piece as seen by a renderer.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PieceView {
    pub kind: PieceKind,
    pub shape: Shape,
    pub x: i16,
    pub y: i16,
}

/// Immutable copy of the full game state.
///
/// Taken atomically between commands by [`GameEngine::snapshot`], so an
/// observer never sees a lock pipeline in progress. Safe to hand to a
/// renderer on another thread.
///
/// [`GameEngine::snapshot`]: super::game::GameEngine::snapshot
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    /// Locked board contents, row 0 first.
    pub grid: [[Cell; Board::WIDTH]; Board::HEIGHT],
    /// The falling piece.
    pub piece: PieceView,
    /// Row the falling piece would land on if hard-dropped now.
    pub ghost_y: i16,
    /// Upcoming piece kinds, soonest first.
    pub next: [PieceKind; NEXT_QUEUE_LEN],
    /// Piece kind in the hold slot, if any.
    pub hold: Option<PieceKind>,
    /// Whether a hold is allowed before the next lock.
    pub can_hold: bool,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub paused: bool,
    pub game_over: bool,
}
