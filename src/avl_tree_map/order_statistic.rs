use std::borrow::Borrow;
use std::ops::{Index, IndexMut};

use super::{AvlTreeMap, Cursor};
use crate::comparator::Comparator;
use crate::error::{Error, Result};
use crate::{OrderedRankMap, Rank};

impl<K, V, C> AvlTreeMap<K, V, C> {
    /// Returns the entry at one-based position `rank` in comparator order.
    ///
    /// Returns `None` if `rank` is 0 or greater than [`len`](Self::len).
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_maps::AvlTreeMap;
    ///
    /// let mut map = AvlTreeMap::new();
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
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_maps::{AvlTreeMap, Error};
    ///
    /// let map = AvlTreeMap::from([(1, 'a')]);
    /// assert_eq!(map.try_get_by_rank(1), Ok((&1, &'a')));
    /// assert_eq!(map.try_get_by_rank(2), Err(Error::RankOutOfRange { rank: 2, len: 1 }));
    /// ```
    pub fn try_get_by_rank(&self, rank: usize) -> Result<(&K, &V)> {
        self.get_by_rank(rank).ok_or(Error::RankOutOfRange { rank, len: self.len() })
    }

    /// Returns a cursor at one-based position `rank`, or `None` when the rank
    /// is out of range.
    pub fn find_by_rank(&self, rank: usize) -> Option<Cursor<'_, K, V>> {
        let handle = self.raw.get_by_rank(rank)?;
        Some(self.cursor_at(Some(handle)))
    }

    /// Returns the one-based rank of `key`, or `None` if the key is absent.
    ///
    /// # Complexity
    ///
    /// O(log n)
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
impl<K, V, C> Index<Rank> for AvlTreeMap<K, V, C> {
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
///
/// # Examples
///
/// ```
/// use ranked_maps::{AvlTreeMap, Rank};
///
/// let mut map = AvlTreeMap::from([("a", 1), ("b", 2)]);
/// map[Rank(2)] = 5;
/// assert_eq!(map.get(&"b"), Some(&5));
/// ```
impl<K, V, C> IndexMut<Rank> for AvlTreeMap<K, V, C> {
    fn index_mut(&mut self, rank: Rank) -> &mut Self::Output {
        self.get_by_rank_mut(rank.0).map(|(_, v)| v).expect("rank out of range")
    }
}

impl<K, V, C: Comparator<K>> OrderedRankMap<K, V> for AvlTreeMap<K, V, C> {
    type Cursor<'a>
        = Cursor<'a, K, V>
    where
        Self: 'a,
        K: 'a,
        V: 'a;

    fn insert(&mut self, key: K, value: V) -> bool {
        AvlTreeMap::insert(self, key, value).is_none()
    }

    fn find(&self, key: &K) -> Option<Cursor<'_, K, V>> {
        AvlTreeMap::find(self, key)
    }

    fn find_by_rank(&self, rank: usize) -> Option<Cursor<'_, K, V>> {
        AvlTreeMap::find_by_rank(self, rank)
    }

    fn erase(&mut self, key: &K) -> bool {
        self.remove(key).is_some()
    }

    fn at(&self, key: &K) -> Result<&V> {
        AvlTreeMap::at(self, key)
    }

    fn try_get_by_rank(&self, rank: usize) -> Result<(&K, &V)> {
        AvlTreeMap::try_get_by_rank(self, rank)
    }

    fn len(&self) -> usize {
        AvlTreeMap::len(self)
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
    fn ranks_after_removals() {
        let mut map: AvlTreeMap<_, _> = (1..=100).map(|i| (i, ())).collect();
        for key in (2..=100).step_by(2) {
            map.remove(&key);
        }
        for rank in 1..=50 {
            let key = 2 * rank - 1;
            assert_eq!(map.get_by_rank(rank), Some((&key, &())));
            assert_eq!(map.rank_of(&key), Some(rank));
        }
        assert_eq!(map.rank_of(&2), None);
        assert!(map.find_by_rank(51).is_none());
    }

    #[test]
    fn ranks_follow_the_comparator() {
        let mut map = AvlTreeMap::with_comparator(Descending);
        map.extend((1..=20).map(|i| (i, i)));
        assert_eq!(map[Rank(1)], 20);
        assert_eq!(map.rank_of(&1), Some(20));
    }

    #[test]
    #[should_panic(expected = "rank out of range")]
    fn rank_index_past_the_end_panics() {
        let mut map = AvlTreeMap::from([(1, 1)]);
        map[Rank(2)] = 0;
    }

    #[test]
    fn contract_insert_reports_novelty() {
        let mut map: AvlTreeMap<i32, &str> = AvlTreeMap::new();
        assert!(OrderedRankMap::insert(&mut map, 1, "a"));
        assert!(!OrderedRankMap::insert(&mut map, 1, "b"));
        assert_eq!(OrderedRankMap::at(&map, &1), Ok(&"b"));
        assert_eq!(OrderedRankMap::last(&map), Some((&1, &"b")));
        assert!(OrderedRankMap::erase(&mut map, &1));
        assert!(!OrderedRankMap::erase(&mut map, &1));
        assert!(OrderedRankMap::begin(&map).is_end());
    }
}
