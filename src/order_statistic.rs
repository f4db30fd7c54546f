use crate::error::Result;

/// A one-based rank into the comparator order of a map.
///
/// `Rank(1)` is the first entry. Used to index a map by position.
///
/// # Examples
///
/// ```
/// use ranked_maps::{AvlTreeMap, Rank};
///
/// let mut map = AvlTreeMap::new();
/// map.insert("a", 10);
/// map.insert("b", 20);
///
/// assert_eq!(map[Rank(1)], 10);
/// assert_eq!(map[Rank(2)], 20);
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Rank(pub usize);

/// The contract shared by [`SkipListMap`](crate::SkipListMap) and
/// [`AvlTreeMap`](crate::AvlTreeMap): an ordered map with O(log n) access by
/// one-based rank.
///
/// Absence is never an error here. A missing key or an out-of-range rank is
/// `None` (or `false` from [`erase`](Self::erase)); only [`at`](Self::at) and
/// [`try_get_by_rank`](Self::try_get_by_rank) report an [`Error`](crate::Error).
///
/// # Examples
///
/// ```
/// use ranked_maps::{AvlTreeMap, OrderedRankMap, SkipListMap};
///
/// fn median<M: OrderedRankMap<u32, &'static str>>(map: &M) -> Option<u32> {
///     let (key, _) = map.find_by_rank(map.len().div_ceil(2))?.next()?;
///     Some(*key)
/// }
///
/// let mut skip = SkipListMap::new();
/// let mut avl = AvlTreeMap::new();
/// for (k, v) in [(5, "e"), (1, "a"), (3, "c")] {
///     skip.insert(k, v);
///     avl.insert(k, v);
/// }
/// assert_eq!(median(&skip), Some(3));
/// assert_eq!(median(&avl), Some(3));
/// ```
pub trait OrderedRankMap<K, V> {
    /// A borrowed position in the map. Iterating it yields the entry it points
    /// at and then every following entry in comparator order.
    type Cursor<'a>: Iterator<Item = (&'a K, &'a V)> + Clone
    where
        Self: 'a,
        K: 'a,
        V: 'a;

    /// Inserts `value` under `key`. Returns `true` if a new entry was created and
    /// `false` if an existing entry's value was overwritten.
    fn insert(&mut self, key: K, value: V) -> bool;

    /// Returns a cursor at `key`, or `None` if the key is absent.
    fn find(&self, key: &K) -> Option<Self::Cursor<'_>>;

    /// Returns a cursor at the entry of one-based `rank`, or `None` when `rank`
    /// is 0 or greater than [`len`](Self::len).
    fn find_by_rank(&self, rank: usize) -> Option<Self::Cursor<'_>>;

    /// Removes `key`. Returns `true` if it was present.
    fn erase(&mut self, key: &K) -> bool;

    /// Returns the value stored under `key`.
    ///
    /// # Errors
    ///
    /// [`Error::KeyNotFound`](crate::Error::KeyNotFound) if the key is absent.
    fn at(&self, key: &K) -> Result<&V>;

    /// Returns the entry of one-based `rank`.
    ///
    /// # Errors
    ///
    /// [`Error::RankOutOfRange`](crate::Error::RankOutOfRange) when `rank` is 0
    /// or greater than [`len`](Self::len).
    fn try_get_by_rank(&self, rank: usize) -> Result<(&K, &V)>;

    /// Number of entries.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cursor at the first entry in comparator order (already exhausted when
    /// the map is empty).
    fn begin(&self) -> Self::Cursor<'_>;

    /// The last entry in comparator order.
    fn last(&self) -> Option<(&K, &V)>;
}
