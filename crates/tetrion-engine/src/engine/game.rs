use std::collections::VecDeque;

use rand::Rng as _;

use crate::core::{
    board::Board,
    piece::{Piece, PieceKind},
};

use super::{
    bag::{BagSeed, PieceBag},
    progress::Progress,
    rotation,
    snapshot::{PieceView, Snapshot},
};

/// Number of upcoming pieces visible to the player.
pub const NEXT_QUEUE_LEN: usize = 4;

/// Lifecycle state of a game.
///
/// `Active` and `Paused` toggle through [`GameEngine::pause`] and
/// [`GameEngine::resume`]; `GameOver` is terminal until
/// [`GameEngine::reset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum GamePhase {
    Active,
    Paused,
    GameOver,
}

/// Command-driven Tetris state machine.
///
/// The engine exclusively owns the board, the active piece, the piece
/// supply, and the hold slot. All mutation goes through the command
/// methods, each of which returns synchronously; commands other than
/// [`GameEngine::reset`] are no-ops while paused or after game over,
/// signalled by a `false` return where the command reports success.
///
/// Time is external: gravity advances only inside [`GameEngine::tick`],
/// driven by a caller-supplied monotonic millisecond clock.
#[derive(Debug, Clone)]
pub struct GameEngine {
    board: Board,
    current: Piece,
    bag: PieceBag,
    next_queue: VecDeque<PieceKind>,
    hold: Option<PieceKind>,
    can_hold: bool,
    progress: Progress,
    last_drop_ms: Option<u64>,
    phase: GamePhase,
}

impl Default for GameEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl GameEngine {
    /// Creates a running game with a random piece sequence.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    /// Like [`Self::new`], but with a specific seed so the piece sequence
    /// is deterministic.
    #[must_use]
    pub fn with_seed(seed: BagSeed) -> Self {
        let mut bag = PieceBag::with_seed(seed);
        let mut next_queue: VecDeque<PieceKind> =
            (0..NEXT_QUEUE_LEN).map(|_| bag.draw()).collect();
        let first = next_queue.pop_front().expect("queue was just filled");
        next_queue.push_back(bag.draw());
        Self {
            board: Board::EMPTY,
            current: Piece::spawn(first),
            bag,
            next_queue,
            hold: None,
            can_hold: true,
            progress: Progress::new(),
            last_drop_ms: None,
            phase: GamePhase::Active,
        }
    }

    #[must_use]
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn current_piece(&self) -> &Piece {
        &self.current
    }

    #[must_use]
    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    #[must_use]
    pub fn held_piece(&self) -> Option<PieceKind> {
        self.hold
    }

    /// Translates the active piece by `(dx, dy)` if the target placement is
    /// legal. Returns whether the piece moved.
    pub fn move_piece(&mut self, dx: i16, dy: i16) -> bool {
        if !self.phase.is_active() {
            return false;
        }
        if !self.board.is_legal(&self.current, dx, dy) {
            return false;
        }
        self.current = self.current.translated(dx, dy);
        true
    }

    /// Rotates the active piece one step with wall-kick resolution.
    /// Returns whether a legal rotation was found; on `false` the piece is
    /// unchanged.
    pub fn rotate(&mut self, clockwise: bool) -> bool {
        if !self.phase.is_active() {
            return false;
        }
        let Some(piece) = rotation::try_rotate(&self.current, &self.board, clockwise) else {
            return false;
        };
        self.current = piece;
        true
    }

    /// Moves the piece down one row, scoring 1 point on success and
    /// restarting the gravity interval.
    pub fn soft_drop(&mut self) -> bool {
        if !self.move_piece(0, 1) {
            return false;
        }
        self.progress.record_soft_drop();
        self.last_drop_ms = None;
        true
    }

    /// Drops the piece straight down and locks it, scoring 2 points per row
    /// fallen.
    pub fn hard_drop(&mut self) {
        if !self.phase.is_active() {
            return;
        }
        let mut rows = 0;
        while self.board.is_legal(&self.current, 0, 1) {
            self.current = self.current.translated(0, 1);
            rows += 1;
        }
        self.progress.record_hard_drop(rows);
        self.lock_current();
    }

    /// Sets the active piece aside, swapping in the held kind (or the next
    /// queued piece when the hold slot is empty). Allowed once per spawn;
    /// silently ignored otherwise.
    pub fn hold(&mut self) {
        if !self.phase.is_active() || !self.can_hold {
            return;
        }
        let active = self.current.kind();
        match self.hold.take() {
            Some(held) => self.current = Piece::spawn(held),
            None => self.spawn_next(),
        }
        self.hold = Some(active);
        self.can_hold = false;
    }

    /// Advances gravity. Once per elapsed drop interval the piece falls one
    /// row, or locks when it cannot. `now_ms` comes from the caller's
    /// monotonic clock; the first tick after a reset, resume, or soft drop
    /// only re-arms the interval.
    pub fn tick(&mut self, now_ms: u64) {
        if !self.phase.is_active() {
            return;
        }
        let Some(last) = self.last_drop_ms else {
            self.last_drop_ms = Some(now_ms);
            return;
        };
        if now_ms.saturating_sub(last) < self.progress.drop_interval_ms() {
            return;
        }
        if !self.move_piece(0, 1) {
            self.lock_current();
        }
        self.last_drop_ms = Some(now_ms);
    }

    /// Pauses an active game; ignored while paused or after game over.
    pub fn pause(&mut self) {
        if self.phase.is_active() {
            self.phase = GamePhase::Paused;
        }
    }

    /// Resumes a paused game, restarting the gravity interval.
    pub fn resume(&mut self) {
        if self.phase.is_paused() {
            self.phase = GamePhase::Active;
            self.last_drop_ms = None;
        }
    }

    /// Restarts the game from scratch: empty board, zeroed progress, fresh
    /// queue and first piece. Works from any phase, including game over.
    pub fn reset(&mut self) {
        self.board = Board::EMPTY;
        self.bag.restart();
        self.next_queue.clear();
        for _ in 0..NEXT_QUEUE_LEN {
            self.next_queue.push_back(self.bag.draw());
        }
        self.hold = None;
        self.progress = Progress::new();
        self.last_drop_ms = None;
        self.phase = GamePhase::Active;
        self.spawn_next();
    }

    /// Read-only copy of the full game state for rendering.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            grid: *self.board.grid(),
            piece: PieceView {
                kind: self.current.kind(),
                shape: self.current.shape(),
                x: self.current.x(),
                y: self.current.y(),
            },
            ghost_y: self.current.y() + self.board.ghost_drop_offset(&self.current),
            next: std::array::from_fn(|i| self.next_queue[i]),
            hold: self.hold,
            can_hold: self.can_hold,
            score: self.progress.score(),
            level: self.progress.level(),
            lines: self.progress.lines(),
            paused: self.phase.is_paused(),
            game_over: self.phase.is_game_over(),
        }
    }

    /// Lock pipeline: commit the piece, clear lines, score, spawn the next
    /// piece. Runs to completion within one command, so observers only see
    /// the pre-lock or post-spawn state.
    fn lock_current(&mut self) {
        self.board.lock(&self.current);
        let cleared = self.board.clear_full_lines();
        self.progress.record_lock(cleared);
        self.spawn_next();
    }

    fn spawn_next(&mut self) {
        let kind = self.next_queue.pop_front().expect("next queue is never empty");
        self.next_queue.push_back(self.bag.draw());
        self.current = Piece::spawn(kind);
        self.can_hold = true;
        if !self.board.is_legal(&self.current, 0, 0) {
            self.phase = GamePhase::GameOver;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> GameEngine {
        GameEngine::with_seed(BagSeed::from_bytes([1; 16]))
    }

    /// Board with the given rows filled except for one hole pattern each,
    /// stacked at the bottom.
    fn bottom_rows(rows: &[&str]) -> Board {
        let mut art = String::new();
        for _ in 0..Board::HEIGHT - rows.len() {
            art.push_str("..........\n");
        }
        for row in rows {
            art.push_str(row);
            art.push('\n');
        }
        Board::from_ascii(&art)
    }

    #[test]
    fn new_game_snapshot() {
        let snapshot = engine().snapshot();
        assert_eq!(snapshot.score, 0);
        assert_eq!(snapshot.level, 1);
        assert_eq!(snapshot.lines, 0);
        assert_eq!(snapshot.hold, None);
        assert!(snapshot.can_hold);
        assert!(!snapshot.paused);
        assert!(!snapshot.game_over);
        assert!(snapshot.grid.iter().flatten().all(|cell| cell.is_empty()));
    }

    #[test]
    fn next_queue_stays_at_four() {
        let mut game = engine();
        assert_eq!(game.next_queue.len(), NEXT_QUEUE_LEN);
        for _ in 0..10 {
            game.hard_drop();
        }
        assert_eq!(game.next_queue.len(), NEXT_QUEUE_LEN);
    }

    #[test]
    fn move_piece_checks_legality() {
        let mut game = engine();
        let x0 = game.current.x();
        assert!(game.move_piece(1, 0));
        assert_eq!(game.current.x(), x0 + 1);
        // Run into the right wall.
        while game.move_piece(1, 0) {}
        let x_wall = game.current.x();
        assert!(!game.move_piece(1, 0));
        assert_eq!(game.current.x(), x_wall);
    }

    #[test]
    fn soft_drop_scores_one_point_per_row() {
        let mut game = engine();
        assert!(game.soft_drop());
        assert!(game.soft_drop());
        assert_eq!(game.current.y(), 2);
        assert_eq!(game.progress().score(), 2);
    }

    #[test]
    fn hard_drop_of_five_rows_scores_ten() {
        let mut game = engine();
        // A solid shelf with one unfillable hole per row keeps the drop
        // from clearing lines.
        game.board = bottom_rows(&[
            "#########.",
            "#########.",
            "#########.",
            "#########.",
            "#########.",
            "#########.",
            "#########.",
            "#########.",
            "#########.",
            "#########.",
            "#########.",
            "#########.",
            "#########.",
        ]);
        game.current = Piece::spawn(PieceKind::T); // bottom cells in row 1
        game.hard_drop();
        assert_eq!(game.progress().score(), 10);
        assert_eq!(game.progress().lines(), 0);
    }

    #[test]
    fn hard_drop_locks_and_clears() {
        let mut game = engine();
        game.board = bottom_rows(&["###....###"]);
        game.current = Piece::spawn(PieceKind::I); // covers columns 3-6
        game.hard_drop();
        // 18 rows fallen at 2 points each, plus a single-line clear.
        assert_eq!(game.progress().score(), 18 * 2 + 100);
        assert_eq!(game.progress().lines(), 1);
        assert!(game.board.grid().iter().flatten().all(|cell| cell.is_empty()));
        assert!(game.phase().is_active());
    }

    #[test]
    fn hold_swaps_with_queue_when_empty() {
        let mut game = engine();
        let active = game.current.kind();
        let upcoming = game.next_queue[0];
        game.hold();
        assert_eq!(game.held_piece(), Some(active));
        assert_eq!(game.current.kind(), upcoming);
        assert!(!game.can_hold);
    }

    #[test]
    fn second_hold_before_lock_is_ignored() {
        let mut game = engine();
        game.hold();
        let held = game.held_piece();
        let current = game.current;
        game.hold();
        assert_eq!(game.held_piece(), held);
        assert_eq!(game.current, current);
        assert!(!game.can_hold);
    }

    #[test]
    fn hold_reenabled_after_lock_and_swaps_back() {
        let mut game = engine();
        let first = game.current.kind();
        game.hold();
        game.hard_drop();
        assert!(game.can_hold);
        let active = game.current.kind();
        game.hold();
        assert_eq!(game.current.kind(), first);
        assert_eq!(game.held_piece(), Some(active));
    }

    #[test]
    fn tick_applies_gravity_per_interval() {
        let mut game = engine();
        game.tick(0); // arms the interval
        assert_eq!(game.current.y(), 0);
        game.tick(999);
        assert_eq!(game.current.y(), 0);
        game.tick(1000);
        assert_eq!(game.current.y(), 1);
        game.tick(1500);
        assert_eq!(game.current.y(), 1);
        game.tick(2000);
        assert_eq!(game.current.y(), 2);
    }

    #[test]
    fn tick_locks_when_drop_is_blocked() {
        let mut game = engine();
        game.current = Piece::spawn(PieceKind::O).translated(0, 18);
        game.tick(0);
        game.tick(1000);
        // The O could not fall, so it locked and the next piece spawned.
        assert_eq!(game.board.grid()[19][4], crate::Cell::Piece(PieceKind::O));
        assert_eq!(game.current.y(), 0);
        assert!(game.can_hold);
    }

    #[test]
    fn soft_drop_restarts_gravity_interval() {
        let mut game = engine();
        game.tick(0);
        game.soft_drop();
        // Without the restart this tick would apply gravity.
        game.tick(1000);
        assert_eq!(game.current.y(), 1);
        game.tick(2000);
        assert_eq!(game.current.y(), 2);
    }

    #[test]
    fn pause_gates_commands_and_is_idempotent() {
        let mut game = engine();
        game.pause();
        assert!(game.phase().is_paused());
        let before = game.current;
        assert!(!game.move_piece(1, 0));
        assert!(!game.rotate(true));
        assert!(!game.soft_drop());
        game.hard_drop();
        game.hold();
        game.tick(10_000);
        assert_eq!(game.current, before);
        assert_eq!(game.progress().score(), 0);

        game.pause();
        assert!(game.phase().is_paused());
        game.resume();
        assert!(game.phase().is_active());
        game.resume();
        assert!(game.phase().is_active());
    }

    #[test]
    fn spawn_collision_ends_the_game() {
        let mut game = engine();
        // Bury the spawn rows so the next spawn cannot fit.
        game.board = Board::from_ascii(
            "#########.
             #########.
             #########.",
        );
        game.current = Piece::spawn(PieceKind::O).translated(3, 16);
        game.hard_drop();
        assert!(game.phase().is_game_over());
        assert!(game.snapshot().game_over);

        // Terminal: every non-reset command is now a no-op.
        let piece = game.current;
        assert!(!game.move_piece(0, 1));
        assert!(!game.rotate(true));
        game.hold();
        game.tick(1_000_000);
        game.pause();
        assert!(game.phase().is_game_over());
        assert_eq!(game.current, piece);
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut game = engine();
        game.soft_drop();
        game.board = Board::from_ascii("#########.");
        game.hold();
        game.pause();

        game.reset();
        let snapshot = game.snapshot();
        assert_eq!(snapshot.score, 0);
        assert_eq!(snapshot.level, 1);
        assert_eq!(snapshot.lines, 0);
        assert_eq!(snapshot.hold, None);
        assert!(snapshot.can_hold);
        assert!(!snapshot.paused);
        assert!(!snapshot.game_over);
        assert!(snapshot.grid.iter().flatten().all(|cell| cell.is_empty()));
        assert_eq!(game.next_queue.len(), NEXT_QUEUE_LEN);
        assert_eq!(game.current.y(), 0);
    }

    #[test]
    fn reset_recovers_from_game_over() {
        let mut game = engine();
        game.board = Board::from_ascii(
            "#########.
             #########.",
        );
        game.current = Piece::spawn(PieceKind::O).translated(3, 16);
        game.hard_drop();
        assert!(game.phase().is_game_over());

        game.reset();
        assert!(game.phase().is_active());
        assert!(!game.snapshot().game_over);
        assert_eq!(game.snapshot().score, 0);
    }

    #[test]
    fn snapshot_ghost_tracks_the_stack() {
        let mut game = engine();
        game.current = Piece::spawn(PieceKind::T);
        assert_eq!(game.snapshot().ghost_y, 18);
        game.board = bottom_rows(&["##########"; 5]);
        // from_ascii fills rows; a full bottom would have cleared in play,
        // but for the ghost only the stack height matters.
        assert_eq!(game.snapshot().ghost_y, 13);
    }

    #[test]
    fn snapshot_serializes() {
        let game = engine();
        let value = serde_json::to_value(game.snapshot()).unwrap();
        assert_eq!(value["score"], 0);
        assert_eq!(value["level"], 1);
        assert_eq!(value["game_over"], false);
        assert_eq!(value["next"].as_array().unwrap().len(), NEXT_QUEUE_LEN);
        assert_eq!(value["grid"].as_array().unwrap().len(), Board::HEIGHT);
    }

    #[test]
    fn two_line_clear_at_level_three_scores_900() {
        let mut game = engine();
        // Put progress at level 3 (20-29 lines), then measure one double
        // in isolation.
        for _ in 0..5 {
            game.progress.record_lock(4);
        }
        assert_eq!(game.progress().level(), 3);
        let before = game.progress().score();

        // Columns 0-1 are open all the way down; an O dropped there
        // completes exactly the bottom two rows.
        game.board = bottom_rows(&["..########", "..########", "..########", "..########"]);
        game.current = Piece::spawn(PieceKind::O).translated(-4, 0);
        game.hard_drop();
        let drop_points = 2 * 18;
        assert_eq!(game.progress().lines(), 22);
        assert_eq!(game.progress().score() - before, 900 + drop_points);
    }
}
