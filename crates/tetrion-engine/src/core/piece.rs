use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use super::board::Board;

/// Enum representing the type of tetromino.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, derive_more::Display,
)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 0,
    /// O-piece.
    O = 1,
    /// T-piece.
    T = 2,
    /// L-piece.
    L = 3,
    /// J-piece.
    J = 4,
    /// S-piece.
    S = 5,
    /// Z-piece.
    Z = 6,
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    /// All piece types, in canonical order.
    pub const ALL: [Self; Self::LEN] = [
        Self::I,
        Self::O,
        Self::T,
        Self::L,
        Self::J,
        Self::S,
        Self::Z,
    ];

    pub(crate) const fn as_usize(self) -> usize {
        self as usize
    }
}

/// Rotation state of a piece.
///
/// One of four states, cycling modulo 4:
///
/// - `0`: spawn orientation
/// - `1`: 90° clockwise
/// - `2`: 180°
/// - `3`: 270° clockwise (90° counterclockwise)
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rotation(u8);

impl Rotation {
    #[must_use]
    pub fn rotated(self, clockwise: bool) -> Self {
        if clockwise {
            Rotation((self.0 + 1) % 4)
        } else {
            Rotation((self.0 + 3) % 4)
        }
    }

    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A piece's occupancy within its square bounding box.
///
/// The box is 4×4 for I, 2×2 for O, and 3×3 for every other piece. Rows are
/// stored as bitmasks where bit `x` set means cell `(x, y)` is filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Shape {
    size: u8,
    rows: [u8; 4],
}

impl Shape {
    /// Side length of the bounding box.
    #[must_use]
    pub fn size(&self) -> usize {
        usize::from(self.size)
    }

    /// Whether the cell at `(x, y)` within the bounding box is filled.
    #[must_use]
    pub fn is_set(&self, x: usize, y: usize) -> bool {
        y < self.size() && (self.rows[y] & (1 << x)) != 0
    }

    /// Box-local coordinates of the four filled cells, row-major.
    #[expect(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn cells(&self) -> ArrayVec<(i16, i16), 4> {
        let mut cells = ArrayVec::new();
        for y in 0..self.size() {
            for x in 0..self.size() {
                if self.is_set(x, y) {
                    cells.push((x as i16, y as i16));
                }
            }
        }
        cells
    }
}

/// Generates all 4 rotation states of a shape by repeated 90° clockwise
/// rotation, mapping cell `(y, x)` to `(x, size - 1 - y)`.
const fn rotations(size: u8, rows: [u8; 4]) -> [Shape; 4] {
    let n = size as usize;
    let mut states = [Shape { size, rows }; 4];
    let mut i = 1;
    while i < 4 {
        let prev = states[i - 1].rows;
        let mut next = [0u8; 4];
        let mut y = 0;
        while y < n {
            let mut x = 0;
            while x < n {
                if prev[y] & (1 << x) != 0 {
                    next[x] |= 1 << (n - 1 - y);
                }
                x += 1;
            }
            y += 1;
        }
        states[i] = Shape { size, rows: next };
        i += 1;
    }
    states
}

/// Canonical shapes and their precomputed rotation states, indexed by
/// [`PieceKind`] then [`Rotation`].
const SHAPES: [[Shape; 4]; PieceKind::LEN] = [
    // I-piece
    rotations(4, [0b0000, 0b1111, 0b0000, 0b0000]),
    // O-piece (rotation is the identity)
    rotations(2, [0b11, 0b11, 0b00, 0b00]),
    // T-piece
    rotations(3, [0b010, 0b111, 0b000, 0b000]),
    // L-piece
    rotations(3, [0b100, 0b111, 0b000, 0b000]),
    // J-piece
    rotations(3, [0b001, 0b111, 0b000, 0b000]),
    // S-piece
    rotations(3, [0b110, 0b011, 0b000, 0b000]),
    // Z-piece
    rotations(3, [0b011, 0b110, 0b000, 0b000]),
];

/// A tetromino at a specific position and orientation.
///
/// `(x, y)` is the top-left corner of the shape's bounding box in board
/// coordinates, y growing downward. Coordinates are signed: wall kicks and
/// spawning can place cells above the visible board (`y < 0`).
///
/// Pieces are immutable; movement and rotation return new `Piece` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    kind: PieceKind,
    rotation: Rotation,
    x: i16,
    y: i16,
}

impl Piece {
    /// Creates a piece at its spawn position: horizontally centered
    /// (`x = (10 - width) / 2`), top of the board, spawn orientation.
    #[expect(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn spawn(kind: PieceKind) -> Self {
        let width = SHAPES[kind.as_usize()][0].size as i16;
        Self {
            kind,
            rotation: Rotation::default(),
            x: (Board::WIDTH as i16 - width) / 2,
            y: 0,
        }
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    #[must_use]
    pub fn x(&self) -> i16 {
        self.x
    }

    #[must_use]
    pub fn y(&self) -> i16 {
        self.y
    }

    /// The shape for the current rotation state.
    #[must_use]
    pub fn shape(&self) -> Shape {
        SHAPES[self.kind.as_usize()][self.rotation.index()]
    }

    /// The shape this piece would have after one rotation step.
    #[must_use]
    pub fn rotated_shape(&self, clockwise: bool) -> Shape {
        SHAPES[self.kind.as_usize()][self.rotation.rotated(clockwise).index()]
    }

    /// Board coordinates of every filled cell.
    #[must_use]
    pub fn cells(&self) -> ArrayVec<(i16, i16), 4> {
        let mut cells = self.shape().cells();
        for (x, y) in &mut cells {
            *x += self.x;
            *y += self.y;
        }
        cells
    }

    #[must_use]
    pub(crate) fn translated(self, dx: i16, dy: i16) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    #[must_use]
    pub(crate) fn rotated_to(self, rotation: Rotation, dx: i16, dy: i16) -> Self {
        Self {
            rotation,
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }
}
