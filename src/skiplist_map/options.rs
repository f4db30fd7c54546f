use super::level::{CoinFlip, DEFAULT_MAX_LEVEL};

/// Construction options for a [`SkipListMap`](crate::SkipListMap) using the
/// default [`CoinFlip`] level generator.
///
/// # Examples
///
/// ```
/// use ranked_maps::{Ascending, SkipListMap};
/// use ranked_maps::skiplist_map::SkipListOptions;
///
/// let options = SkipListOptions::new().with_max_level(8).with_seed(7);
/// let mut map = SkipListMap::with_options(options, Ascending);
/// map.insert(1, "one");
/// assert!(map.height() <= 8);
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SkipListOptions {
    max_level: usize,
    seed: Option<u64>,
}

impl Default for SkipListOptions {
    fn default() -> Self {
        Self {
            max_level: DEFAULT_MAX_LEVEL,
            seed: None,
        }
    }
}

impl SkipListOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Caps node heights. Pick roughly `log2` of the largest expected length.
    ///
    /// Validated when the map is built: it must lie in
    /// `1..=`[`MAX_LEVEL_LIMIT`](super::MAX_LEVEL_LIMIT).
    #[must_use]
    pub const fn with_max_level(mut self, max_level: usize) -> Self {
        self.max_level = max_level;
        self
    }

    /// Seeds the level generator, making node heights reproducible.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub const fn max_level(&self) -> usize {
        self.max_level
    }

    #[must_use]
    pub const fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub(crate) fn generator(&self) -> CoinFlip {
        match self.seed {
            Some(seed) => CoinFlip::with_seed(self.max_level, seed),
            None => CoinFlip::new(self.max_level),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skiplist_map::LevelGenerator;

    #[test]
    fn defaults() {
        let options = SkipListOptions::default();
        assert_eq!(options.max_level(), DEFAULT_MAX_LEVEL);
        assert_eq!(options.seed(), None);
        assert_eq!(options.generator().max_level(), DEFAULT_MAX_LEVEL);
    }

    #[test]
    fn seeded_generators_agree() {
        let options = SkipListOptions::new().with_max_level(10).with_seed(3);
        let (mut a, mut b) = (options.generator(), options.generator());
        assert!((0..64).all(|_| a.random_level() == b.random_level()));
    }

    #[test]
    #[should_panic(expected = "max level 0 outside")]
    fn zero_levels_rejected_at_build() {
        let _ = SkipListOptions::new().with_max_level(0).generator();
    }
}
