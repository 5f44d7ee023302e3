//! Super Rotation System wall-kick resolution.
//!
//! When a rotation would collide, up to five positional offsets ("kicks")
//! are tried in order; the first legal one wins. The I piece has its own
//! table; J, L, S, T, and Z share one; O never rotates.

use crate::core::{
    board::Board,
    piece::{Piece, PieceKind, Rotation},
};

/// One wall-kick offset, `(dx, dy)` with y growing downward.
type Kick = (i16, i16);

/// Kick offsets shared by J, L, S, T, and Z, indexed by rotation transition.
const COMMON_KICKS: [[Kick; 5]; 8] = [
    // 0 -> 1
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
    // 1 -> 0
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    // 1 -> 2
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    // 2 -> 1
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
    // 2 -> 3
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
    // 3 -> 2
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
    // 3 -> 0
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
    // 0 -> 3
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
];

/// Kick offsets for the I piece, indexed like [`COMMON_KICKS`].
const I_KICKS: [[Kick; 5]; 8] = [
    // 0 -> 1
    [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)],
    // 1 -> 0
    [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)],
    // 1 -> 2
    [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)],
    // 2 -> 1
    [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)],
    // 2 -> 3
    [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)],
    // 3 -> 2
    [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)],
    // 3 -> 0
    [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)],
    // 0 -> 3
    [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)],
];

fn transition_index(from: Rotation, to: Rotation) -> usize {
    match (from.index(), to.index()) {
        (0, 1) => 0,
        (1, 0) => 1,
        (1, 2) => 2,
        (2, 1) => 3,
        (2, 3) => 4,
        (3, 2) => 5,
        (3, 0) => 6,
        (0, 3) => 7,
        _ => unreachable!("rotation advances one step at a time"),
    }
}

fn kick_offsets(kind: PieceKind, from: Rotation, to: Rotation) -> &'static [Kick; 5] {
    let table = if kind == PieceKind::I {
        &I_KICKS
    } else {
        &COMMON_KICKS
    };
    &table[transition_index(from, to)]
}

/// Attempts to rotate the piece one step, resolving collisions with the
/// kick table for the transition.
///
/// Returns the rotated (and possibly kicked) piece, or `None` when every
/// kick offset is illegal or the piece is an O. The input piece is never
/// modified; a `None` means the rotation is silently rejected.
#[must_use]
pub fn try_rotate(piece: &Piece, board: &Board, clockwise: bool) -> Option<Piece> {
    if piece.kind() == PieceKind::O {
        return None;
    }
    let to = piece.rotation().rotated(clockwise);
    let shape = piece.rotated_shape(clockwise);
    for &(dx, dy) in kick_offsets(piece.kind(), piece.rotation(), to) {
        if board.is_legal_with_shape(piece, dx, dy, shape) {
            return Some(piece.rotated_to(to, dx, dy));
        }
    }
    None
}
