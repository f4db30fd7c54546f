use std::borrow::Borrow;
use std::ops::{Index, IndexMut};

use super::{Cursor, LevelGenerator, SkipListMap};
use crate::comparator::Comparator;
use crate::error::{Error, Result};
use crate::{OrderedRankMap, Rank};

impl<K, V, C, G: LevelGenerator> SkipListMap<K, V, C, G> {
    /// Returns the entry at one-based position `rank` in comparator order.
    ///
    /// Returns `None` if `rank` is 0 or greater than [`len`](Self::len).
    ///
    /// # Complexity
    ///
    /// O(log n) expected.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_maps::SkipListMap;
    ///
    /// let mut map = SkipListMap::new();
    /// map.insert("a", 10);
    /// map.insert("c", 30);
    /// map.insert("b", 20);
    ///
    /// assert_eq!(map.get_by_rank(2), Some((&"b", &20)));
    /// assert!(map.get_by_rank(0).is_none());
    /// assert!(map.get_by_rank(4).is_none());
    /// ```
    #[must_use]
    pub fn get_by_rank(&self, rank: usize) -> Option<(&K, &V)> {
        let node = self.raw.node(self.raw.get_by_rank(rank)?);
        Some((&node.key, &node.value))
    }

    /// Returns the key and a mutable reference to the value at one-based
    /// position `rank`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_maps::SkipListMap;
    ///
    /// let mut map = SkipListMap::from([(10, "a"), (5, "b")]);
    /// if let Some((key, value)) = map.get_by_rank_mut(1) {
    ///     assert_eq!(*key, 5);
    ///     *value = "updated";
    /// }
    /// assert_eq!(map.get(&5), Some(&"updated"));
    /// ```
    #[must_use]
    pub fn get_by_rank_mut(&mut self, rank: usize) -> Option<(&K, &mut V)> {
        let handle = self.raw.get_by_rank(rank)?;
        let node = self.raw.node_mut(handle);
        Some((&node.key, &mut node.value))
    }

    /// Like [`get_by_rank`](Self::get_by_rank), but reports the failure.
    ///
    /// # Errors
    ///
    /// [`Error::RankOutOfRange`] when `rank` is 0 or greater than
    /// [`len`](Self::len).
    pub fn try_get_by_rank(&self, rank: usize) -> Result<(&K, &V)> {
        self.get_by_rank(rank).ok_or(Error::RankOutOfRange { rank, len: self.len() })
    }

    /// Returns a cursor at one-based position `rank`, or `None` when the rank
    /// is out of range.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_maps::SkipListMap;
    ///
    /// let map: SkipListMap<_, _> = (1..=5).map(|i| (i * 10, ())).collect();
    /// let tail: Vec<_> = map.find_by_rank(4).unwrap().map(|(k, _)| *k).collect();
    /// assert_eq!(tail, [40, 50]);
    /// ```
    pub fn find_by_rank(&self, rank: usize) -> Option<Cursor<'_, K, V>> {
        let handle = self.raw.get_by_rank(rank)?;
        Some(self.cursor_at(Some(handle)))
    }

    /// Returns the one-based rank of `key`, or `None` if the key is absent.
    ///
    /// # Complexity
    ///
    /// O(log n) expected.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_maps::SkipListMap;
    ///
    /// let map = SkipListMap::from([("b", 2), ("a", 1), ("c", 3)]);
    /// assert_eq!(map.rank_of("a"), Some(1));
    /// assert_eq!(map.rank_of("c"), Some(3));
    /// assert_eq!(map.rank_of("z"), None);
    /// ```
    #[must_use]
    pub fn rank_of<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.raw.rank_of(key)
    }
}

/// Indexes into the map by one-based rank.
///
/// # Panics
///
/// Panics if `rank` is out of range.
///
/// # Examples
///
/// ```
/// use ranked_maps::{Rank, SkipListMap};
///
/// let map = SkipListMap::from([("a", 1), ("b", 2)]);
/// assert_eq!(map[Rank(2)], 2);
/// ```
impl<K, V, C, G: LevelGenerator> Index<Rank> for SkipListMap<K, V, C, G> {
    type Output = V;

    fn index(&self, rank: Rank) -> &Self::Output {
        self.get_by_rank(rank.0).map(|(_, v)| v).expect("rank out of range")
    }
}

/// Mutably indexes into the map by one-based rank.
///
/// # Panics
///
/// Panics if `rank` is out of range.
impl<K, V, C, G: LevelGenerator> IndexMut<Rank> for SkipListMap<K, V, C, G> {
    fn index_mut(&mut self, rank: Rank) -> &mut Self::Output {
        self.get_by_rank_mut(rank.0).map(|(_, v)| v).expect("rank out of range")
    }
}

impl<K, V, C: Comparator<K>, G: LevelGenerator> OrderedRankMap<K, V> for SkipListMap<K, V, C, G> {
    type Cursor<'a>
        = Cursor<'a, K, V>
    where
        Self: 'a,
        K: 'a,
        V: 'a;

    fn insert(&mut self, key: K, value: V) -> bool {
        SkipListMap::insert(self, key, value).is_none()
    }

    fn find(&self, key: &K) -> Option<Cursor<'_, K, V>> {
        SkipListMap::find(self, key)
    }

    fn find_by_rank(&self, rank: usize) -> Option<Cursor<'_, K, V>> {
        SkipListMap::find_by_rank(self, rank)
    }

    fn erase(&mut self, key: &K) -> bool {
        self.remove(key).is_some()
    }

    fn at(&self, key: &K) -> Result<&V> {
        SkipListMap::at(self, key)
    }

    fn try_get_by_rank(&self, rank: usize) -> Result<(&K, &V)> {
        SkipListMap::try_get_by_rank(self, rank)
    }

    fn len(&self) -> usize {
        SkipListMap::len(self)
    }

    fn begin(&self) -> Cursor<'_, K, V> {
        self.cursor_front()
    }

    fn last(&self) -> Option<(&K, &V)> {
        self.last_key_value()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::comparator::Descending;

    #[test]
    fn rank_index_reads_and_writes() {
        let mut map = SkipListMap::from([(3, 'c'), (1, 'a'), (2, 'b')]);
        assert_eq!(map[Rank(1)], 'a');
        map[Rank(3)] = 'z';
        assert_eq!(map.get(&3), Some(&'z'));
    }

    #[test]
    #[should_panic(expected = "rank out of range")]
    fn rank_index_zero_panics() {
        let map = SkipListMap::from([(1, 1)]);
        let _ = map[Rank(0)];
    }

    #[test]
    fn try_get_by_rank_reports_bounds() {
        let map = SkipListMap::from([(1, 1), (2, 2)]);
        assert_eq!(map.try_get_by_rank(2), Ok((&2, &2)));
        assert_eq!(map.try_get_by_rank(3), Err(Error::RankOutOfRange { rank: 3, len: 2 }));
        assert_eq!(map.try_get_by_rank(0), Err(Error::RankOutOfRange { rank: 0, len: 2 }));
    }

    #[test]
    fn ranks_follow_the_comparator() {
        let mut map = SkipListMap::with_comparator(Descending);
        map.extend((1..=20).map(|i| (i, i)));
        for rank in 1..=20 {
            let expected = 21 - rank;
            assert_eq!(map.get_by_rank(rank), Some((&expected, &expected)));
            assert_eq!(map.rank_of(&expected), Some(rank));
        }
    }

    #[test]
    fn contract_insert_reports_novelty() {
        let mut map: SkipListMap<i32, &str> = SkipListMap::new();
        assert!(OrderedRankMap::insert(&mut map, 1, "a"));
        assert!(!OrderedRankMap::insert(&mut map, 1, "b"));
        assert_eq!(OrderedRankMap::len(&map), 1);
        assert_eq!(OrderedRankMap::at(&map, &1), Ok(&"b"));
        assert!(OrderedRankMap::erase(&mut map, &1));
        assert!(!OrderedRankMap::erase(&mut map, &1));
        assert!(OrderedRankMap::is_empty(&map));
        assert!(OrderedRankMap::begin(&map).is_end());
    }
}
