use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
    seq::SliceRandom as _,
};
use rand_pcg::Pcg32;

use crate::core::piece::PieceKind;

/// Seed for deterministic piece generation.
///
/// The same seed produces the same piece sequence, which enables
/// reproducible games and deterministic tests.
#[derive(Debug, Clone, Copy)]
pub struct BagSeed([u8; 16]);

impl BagSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }
}

/// Allows generating random `BagSeed` values with `rng.random()`.
impl Distribution<BagSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> BagSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        BagSeed(seed)
    }
}

/// Strict 7-bag piece randomizer.
///
/// Pieces are drawn from a queue holding a uniformly-random permutation of
/// all 7 kinds. The queue is refilled with a fresh Fisher-Yates shuffle
/// exactly when it empties, so no kind is ever drawn twice before every
/// kind has been drawn once.
#[derive(Debug, Clone)]
pub struct PieceBag {
    rng: Pcg32,
    queue: Vec<PieceKind>,
}

impl Default for PieceBag {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceBag {
    /// Creates a bag with a random seed.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    /// Like [`Self::new`], but with a specific seed for deterministic draws.
    #[must_use]
    pub fn with_seed(seed: BagSeed) -> Self {
        Self {
            rng: Pcg32::from_seed(seed.0),
            queue: Vec::with_capacity(PieceKind::LEN),
        }
    }

    /// Draws the next piece kind, refilling the bag when it is empty.
    pub fn draw(&mut self) -> PieceKind {
        if self.queue.is_empty() {
            let mut bag = PieceKind::ALL;
            bag.shuffle(&mut self.rng);
            self.queue.extend(bag);
        }
        self.queue.pop().expect("freshly refilled bag cannot be empty")
    }

    /// Discards any partially-consumed bag so the next draw starts a fresh
    /// permutation. The random number generator state is kept.
    pub(crate) fn restart(&mut self) {
        self.queue.clear();
    }
}
