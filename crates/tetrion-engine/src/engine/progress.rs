/// Score values for simultaneous line clears, indexed by lines cleared.
const LINE_SCORES: [u32; 5] = [0, 100, 300, 500, 800];

const LINES_PER_LEVEL: u32 = 10;

const BASE_DROP_INTERVAL_MS: u64 = 1000;
const MIN_DROP_INTERVAL_MS: u64 = 50;
const DROP_INTERVAL_STEP_MS: u64 = 75;

/// Score, level, line, and gravity-speed bookkeeping.
///
/// Levels start at 1 and rise by one for every 10 total lines cleared.
/// Line clears score `LINE_SCORES[n] × level`; soft drops score 1 point per
/// row and hard drops 2. The gravity interval shrinks by 75 ms per level
/// from 1000 ms down to a 50 ms floor, recomputed only when the level
/// actually rises.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    score: u32,
    level: u32,
    lines: u32,
    drop_interval_ms: u64,
    line_clear_counter: [u32; 5],
}

impl Default for Progress {
    fn default() -> Self {
        Self::new()
    }
}

impl Progress {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            level: 1,
            lines: 0,
            drop_interval_ms: BASE_DROP_INTERVAL_MS,
            line_clear_counter: [0; 5],
        }
    }

    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    #[must_use]
    pub const fn lines(&self) -> u32 {
        self.lines
    }

    /// Current gravity interval in milliseconds.
    #[must_use]
    pub const fn drop_interval_ms(&self) -> u64 {
        self.drop_interval_ms
    }

    /// Histogram of locks by lines cleared at once (index 0 = no clear).
    #[must_use]
    pub const fn line_clear_counter(&self) -> &[u32; 5] {
        &self.line_clear_counter
    }

    /// Records a lock that cleared `cleared` lines (0-4), updating score,
    /// lines, level, and gravity speed.
    #[expect(clippy::cast_possible_truncation)]
    pub(crate) fn record_lock(&mut self, cleared: usize) {
        self.line_clear_counter[cleared] += 1;
        if cleared == 0 {
            return;
        }
        self.score += LINE_SCORES[cleared] * self.level;
        self.lines += cleared as u32;
        let level = self.lines / LINES_PER_LEVEL + 1;
        if level > self.level {
            self.level = level;
            self.drop_interval_ms = BASE_DROP_INTERVAL_MS
                .saturating_sub(u64::from(level - 1) * DROP_INTERVAL_STEP_MS)
                .max(MIN_DROP_INTERVAL_MS);
        }
    }

    pub(crate) fn record_soft_drop(&mut self) {
        self.score += 1;
    }

    pub(crate) fn record_hard_drop(&mut self, rows: u32) {
        self.score += 2 * rows;
    }
}
