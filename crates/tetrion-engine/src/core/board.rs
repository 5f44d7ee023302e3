use serde::{Deserialize, Serialize};

use super::piece::{Piece, PieceKind, Shape};

/// A single cell of the playfield grid.
///
/// Filled cells remember which piece kind locked there, which is the only
/// color information a renderer needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub enum Cell {
    /// Empty cell.
    #[default]
    Empty,
    /// Cell filled by a locked piece of the given kind.
    Piece(PieceKind),
}

impl Cell {
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }
}

/// Fixed 20×10 occupancy grid.
///
/// Cells transition empty→filled only through [`Board::lock`] and
/// filled→empty only through [`Board::clear_full_lines`]. The board knows
/// nothing about gravity or scoring; it answers placement-legality queries
/// and commits locked pieces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    grid: [[Cell; Self::WIDTH]; Self::HEIGHT],
}

impl Board {
    pub const WIDTH: usize = 10;
    pub const HEIGHT: usize = 20;

    pub const EMPTY: Self = Self {
        grid: [[Cell::Empty; Self::WIDTH]; Self::HEIGHT],
    };

    /// Full grid contents, row 0 first.
    #[must_use]
    pub fn grid(&self) -> &[[Cell; Self::WIDTH]; Self::HEIGHT] {
        &self.grid
    }

    /// Whether the piece, offset by `(dx, dy)`, fits on the board.
    ///
    /// A placement is illegal when any filled cell leaves the columns
    /// `[0, 10)`, goes below the bottom row, or overlaps a filled board
    /// cell. Rows above the board (`y < 0`) are exempt from the overlap
    /// check so pieces may hang over the top edge, but their columns are
    /// still bounded.
    #[must_use]
    pub fn is_legal(&self, piece: &Piece, dx: i16, dy: i16) -> bool {
        self.is_legal_with_shape(piece, dx, dy, piece.shape())
    }

    /// Like [`Board::is_legal`], but testing a candidate shape in place of
    /// the piece's current one. Used by rotation resolution, which must
    /// probe the rotated shape before committing it.
    #[expect(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn is_legal_with_shape(&self, piece: &Piece, dx: i16, dy: i16, shape: Shape) -> bool {
        for (cx, cy) in shape.cells() {
            let x = piece.x() + cx + dx;
            let y = piece.y() + cy + dy;
            if x < 0 || x >= Self::WIDTH as i16 || y >= Self::HEIGHT as i16 {
                return false;
            }
            if y >= 0 && !self.cell_at(x, y).is_empty() {
                return false;
            }
        }
        true
    }

    /// Commits the piece's cells into the grid.
    ///
    /// Cells above the board (`y < 0`) are silently dropped: locking a piece
    /// still partly above the visible area keeps only its visible cells.
    pub fn lock(&mut self, piece: &Piece) {
        for (x, y) in piece.cells() {
            if y >= 0 {
                *self.cell_at_mut(x, y) = Cell::Piece(piece.kind());
            }
        }
    }

    /// Removes every fully-filled row, shifting the rows above it down and
    /// inserting empty rows at the top. Relative order of surviving rows is
    /// preserved. Returns the number of rows removed.
    pub fn clear_full_lines(&mut self) -> usize {
        let mut count = 0;
        for y in (0..Self::HEIGHT).rev() {
            if self.grid[y].iter().all(|cell| !cell.is_empty()) {
                count += 1;
                continue;
            }
            if count > 0 {
                self.grid[y + count] = self.grid[y];
            }
        }
        self.grid[..count].fill([Cell::Empty; Self::WIDTH]);
        count
    }

    /// The largest downward offset for which the piece still fits.
    ///
    /// This is where the piece would land on a hard drop; the piece itself
    /// is not moved.
    #[must_use]
    pub fn ghost_drop_offset(&self, piece: &Piece) -> i16 {
        let mut dy = 0;
        while self.is_legal(piece, 0, dy + 1) {
            dy += 1;
        }
        dy
    }

    #[expect(clippy::cast_sign_loss)]
    fn cell_at(&self, x: i16, y: i16) -> Cell {
        self.grid[y as usize][x as usize]
    }

    #[expect(clippy::cast_sign_loss)]
    fn cell_at_mut(&mut self, x: i16, y: i16) -> &mut Cell {
        &mut self.grid[y as usize][x as usize]
    }

    /// Creates a `Board` from ASCII art for testing.
    ///
    /// `'#'` is a filled cell, `'.'` an empty one. Each line must have
    /// exactly 10 cells; up to 20 lines fill the board from the top, and
    /// missing lines stay empty.
    #[must_use]
    pub fn from_ascii(art: &str) -> Self {
        let mut board = Self::EMPTY;
        let lines: Vec<&str> = art.lines().filter(|line| !line.trim().is_empty()).collect();
        assert!(lines.len() <= Self::HEIGHT, "too many rows: {}", lines.len());

        for (y, line) in lines.iter().enumerate() {
            let cells: Vec<char> = line.chars().filter(|c| *c == '#' || *c == '.').collect();
            assert_eq!(
                cells.len(),
                Self::WIDTH,
                "each row must have exactly {} cells, got {} at row {y}",
                Self::WIDTH,
                cells.len(),
            );
            for (x, &ch) in cells.iter().enumerate() {
                if ch == '#' {
                    board.grid[y][x] = Cell::Piece(PieceKind::I);
                }
            }
        }
        board
    }
}
