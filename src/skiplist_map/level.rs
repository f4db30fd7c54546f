use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Level count used when none is configured.
///
/// Keeps expected search cost logarithmic up to roughly 2^15 entries and
/// degrades gracefully beyond that.
pub const DEFAULT_MAX_LEVEL: usize = 15;

/// Largest level count any skip list accepts.
pub const MAX_LEVEL_LIMIT: usize = 32;

/// Source of node heights for a [`SkipListMap`](crate::SkipListMap).
///
/// Heights only influence performance; ordering and rank results are the same
/// for any generator that honours the bounds below.
pub trait LevelGenerator {
    /// The largest level `random_level` may return, in `1..=`[`MAX_LEVEL_LIMIT`].
    fn max_level(&self) -> usize;

    /// Draws the level count for a new node, in `1..=max_level()`.
    ///
    /// Insertion panics if the returned level is outside that range.
    fn random_level(&mut self) -> usize;
}

/// Fair coin flips: level `n` is drawn with probability `2^-n`, capped at
/// `max_level`.
///
/// # Examples
///
/// ```
/// use ranked_maps::skiplist_map::{CoinFlip, LevelGenerator};
///
/// let mut a = CoinFlip::with_seed(12, 42);
/// let mut b = CoinFlip::with_seed(12, 42);
/// for _ in 0..100 {
///     let level = a.random_level();
///     assert!((1..=12).contains(&level));
///     assert_eq!(level, b.random_level());
/// }
/// ```
#[derive(Clone, Debug)]
pub struct CoinFlip {
    max_level: usize,
    rng: SmallRng,
}

impl CoinFlip {
    /// A generator seeded from the thread-local RNG.
    ///
    /// # Panics
    ///
    /// Panics if `max_level` is 0 or greater than [`MAX_LEVEL_LIMIT`].
    #[must_use]
    pub fn new(max_level: usize) -> Self {
        Self::with_rng(max_level, SmallRng::from_rng(&mut rand::rng()))
    }

    /// A generator with a fixed seed, producing the same levels on every run.
    ///
    /// # Panics
    ///
    /// Panics if `max_level` is 0 or greater than [`MAX_LEVEL_LIMIT`].
    #[must_use]
    pub fn with_seed(max_level: usize, seed: u64) -> Self {
        Self::with_rng(max_level, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(max_level: usize, rng: SmallRng) -> Self {
        assert!(
            (1..=MAX_LEVEL_LIMIT).contains(&max_level),
            "`CoinFlip::new()` - max level {max_level} outside 1..={MAX_LEVEL_LIMIT}!"
        );
        Self { max_level, rng }
    }
}

impl Default for CoinFlip {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LEVEL)
    }
}

impl LevelGenerator for CoinFlip {
    fn max_level(&self) -> usize {
        self.max_level
    }

    fn random_level(&mut self) -> usize {
        let mut level = 1;
        while level < self.max_level && self.rng.random_bool(0.5) {
            level += 1;
        }
        level
    }
}
