use std::borrow::Borrow;
use std::fmt;
use std::iter::FusedIterator;
use std::ops::Index;

use crate::comparator::{Ascending, Comparator};
use crate::error::{Error, Result};
use crate::raw::{Arena, Handle, RawSkipList, SkipNode};

mod level;
mod options;
mod order_statistic;

pub use crate::Rank;
pub use level::{CoinFlip, DEFAULT_MAX_LEVEL, LevelGenerator, MAX_LEVEL_LIMIT};
pub use options::SkipListOptions;

/// An ordered map based on a [skip list] whose links record how many entries
/// they jump over.
///
/// Entries are kept in the order defined by the map's [`Comparator`]
/// ([`Ascending`] unless another is chosen at construction). Besides the usual
/// lookups, the per-link spans answer "which entry has rank `k`?" and "what is
/// the rank of this key?" in expected logarithmic time. Ranks are one-based.
///
/// Node heights are drawn from a [`LevelGenerator`]. The default [`CoinFlip`]
/// generator is seeded from the thread RNG; use
/// [`with_options`](SkipListMap::with_options) with a seed when reproducible
/// layouts matter. Heights only affect performance, never results.
///
/// It is a logic error for a key to be modified in such a way that its ordering
/// relative to any other key, as determined by the comparator, changes while it
/// is in the map.
///
/// # Examples
///
/// ```
/// use ranked_maps::SkipListMap;
///
/// let mut scores = SkipListMap::new();
/// scores.insert("carol", 71);
/// scores.insert("alice", 93);
/// scores.insert("bob", 85);
///
/// // Keys come back in order.
/// assert_eq!(scores.keys().copied().collect::<Vec<_>>(), ["alice", "bob", "carol"]);
///
/// // Rank queries are one-based.
/// assert_eq!(scores.get_by_rank(2), Some((&"bob", &85)));
/// assert_eq!(scores.rank_of("carol"), Some(3));
///
/// scores.remove("alice");
/// assert_eq!(scores.get_by_rank(1), Some((&"bob", &85)));
/// ```
///
/// [skip list]: https://en.wikipedia.org/wiki/Skip_list
pub struct SkipListMap<K, V, C = Ascending, G = CoinFlip> {
    raw: RawSkipList<K, V, C, G>,
}

/// A position in a [`SkipListMap`].
///
/// Iterating a cursor yields the entry it points at and then every following
/// entry. Cursors borrow the map, so they can never outlive a mutation.
pub struct Cursor<'a, K, V> {
    nodes: &'a Arena<SkipNode<K, V>>,
    current: Option<Handle>,
}

/// An iterator over the entries of a [`SkipListMap`], in comparator order.
///
/// This `struct` is created by the [`iter`] method on [`SkipListMap`].
///
/// [`iter`]: SkipListMap::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, K, V> {
    cursor: Cursor<'a, K, V>,
    remaining: usize,
}

/// An iterator over the keys of a [`SkipListMap`].
///
/// This `struct` is created by the [`keys`] method on [`SkipListMap`].
///
/// [`keys`]: SkipListMap::keys
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

/// An iterator over the values of a [`SkipListMap`].
///
/// This `struct` is created by the [`values`] method on [`SkipListMap`].
///
/// [`values`]: SkipListMap::values
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<K, V> SkipListMap<K, V> {
    /// Makes a new, empty `SkipListMap` in ascending key order.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_maps::SkipListMap;
    ///
    /// let mut map = SkipListMap::new();
    /// map.insert(1, "a");
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::with_comparator(Ascending)
    }

    /// Creates an empty map with room for at least `capacity` entries.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_maps::SkipListMap;
    ///
    /// let map: SkipListMap<i32, i32> = SkipListMap::with_capacity(32);
    /// assert!(map.capacity() >= 32);
    /// ```
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        SkipListMap {
            raw: RawSkipList::with_capacity(capacity, Ascending, CoinFlip::default()),
        }
    }
}

impl<K, V, C> SkipListMap<K, V, C> {
    /// Makes a new, empty `SkipListMap` ordered by `comparator`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_maps::{Descending, SkipListMap};
    ///
    /// let mut map = SkipListMap::with_comparator(Descending);
    /// map.extend([(1, 'a'), (3, 'c'), (2, 'b')]);
    /// assert_eq!(map.first_key_value(), Some((&3, &'c')));
    /// ```
    #[must_use]
    pub fn with_comparator(comparator: C) -> Self {
        Self::with_options(SkipListOptions::default(), comparator)
    }

    /// Makes a new, empty `SkipListMap` with the given level options.
    ///
    /// # Panics
    ///
    /// Panics if `options.max_level()` is 0 or greater than [`MAX_LEVEL_LIMIT`].
    #[must_use]
    pub fn with_options(options: SkipListOptions, comparator: C) -> Self {
        SkipListMap {
            raw: RawSkipList::new(comparator, options.generator()),
        }
    }
}

impl<K, V, C, G: LevelGenerator> SkipListMap<K, V, C, G> {
    /// Makes a new, empty `SkipListMap` drawing node heights from `levels`.
    ///
    /// # Panics
    ///
    /// Panics if `levels.max_level()` is 0 or greater than [`MAX_LEVEL_LIMIT`].
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_maps::{Ascending, SkipListMap};
    /// use ranked_maps::skiplist_map::LevelGenerator;
    ///
    /// /// Every node on every level: a sorted linked list with express lanes.
    /// struct Tallest;
    ///
    /// impl LevelGenerator for Tallest {
    ///     fn max_level(&self) -> usize {
    ///         3
    ///     }
    ///
    ///     fn random_level(&mut self) -> usize {
    ///         3
    ///     }
    /// }
    ///
    /// let mut map = SkipListMap::with_generator(Ascending, Tallest);
    /// map.insert('x', 1);
    /// assert_eq!(map.height(), 3);
    /// ```
    #[must_use]
    pub fn with_generator(comparator: C, levels: G) -> Self {
        SkipListMap {
            raw: RawSkipList::new(comparator, levels),
        }
    }

    /// Returns the number of entries in the map.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the map contains no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.len() == 0
    }

    /// Number of levels currently in use; 0 for an empty map.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.raw.height()
    }

    /// Returns how many entries the map can hold without reallocating.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// The comparator ordering this map.
    #[must_use]
    pub const fn comparator(&self) -> &C {
        self.raw.comparator()
    }

    /// Removes every entry. The comparator and level generator are kept.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_maps::SkipListMap;
    ///
    /// let mut map = SkipListMap::from([(1, "a"), (2, "b")]);
    /// map.clear();
    /// assert!(map.is_empty());
    /// assert_eq!(map.height(), 0);
    /// ```
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Returns the first entry in comparator order.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.raw.first().map(|h| self.entry_at(h))
    }

    /// Returns the last entry in comparator order.
    ///
    /// # Complexity
    ///
    /// O(1)
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_maps::SkipListMap;
    ///
    /// let map = SkipListMap::from([(1, "b"), (2, "a")]);
    /// assert_eq!(map.last_key_value(), Some((&2, &"a")));
    /// ```
    #[must_use]
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.raw.last().map(|h| self.entry_at(h))
    }

    /// A cursor at the first entry, already at the end when the map is empty.
    pub fn cursor_front(&self) -> Cursor<'_, K, V> {
        self.cursor_at(self.raw.first())
    }

    /// Gets an iterator over the entries of the map, in comparator order.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_maps::SkipListMap;
    ///
    /// let map = SkipListMap::from([(3, "c"), (2, "b"), (1, "a")]);
    /// let (first_key, first_value) = map.iter().next().unwrap();
    /// assert_eq!((*first_key, *first_value), (1, "a"));
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            cursor: self.cursor_front(),
            remaining: self.len(),
        }
    }

    /// Gets an iterator over the keys of the map, in comparator order.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Gets an iterator over the values of the map, in comparator order of their keys.
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    fn cursor_at(&self, current: Option<Handle>) -> Cursor<'_, K, V> {
        Cursor {
            nodes: self.raw.nodes(),
            current,
        }
    }

    fn entry_at(&self, handle: Handle) -> (&K, &V) {
        let node = self.raw.node(handle);
        (&node.key, &node.value)
    }
}

impl<K, V, C: Comparator<K>, G: LevelGenerator> SkipListMap<K, V, C, G> {
    /// Inserts a key-value pair into the map.
    ///
    /// If the map did not have this key present, `None` is returned.
    ///
    /// If the map did have this key present, the value is updated and the old
    /// value is returned. The key and the list structure are left untouched.
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
    /// assert_eq!(map.insert(37, "a"), None);
    /// assert_eq!(map.is_empty(), false);
    ///
    /// map.insert(37, "b");
    /// assert_eq!(map.insert(37, "c"), Some("b"));
    /// assert_eq!(map[&37], "c");
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.raw.insert(key, value).1
    }

    /// Returns the value under `key`, inserting `default()` first if the key is
    /// absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_maps::SkipListMap;
    ///
    /// let mut counts = SkipListMap::new();
    /// for word in ["a", "b", "a"] {
    ///     *counts.get_or_insert_with(word, || 0) += 1;
    /// }
    /// assert_eq!(counts[&"a"], 2);
    /// assert_eq!(counts[&"b"], 1);
    /// ```
    pub fn get_or_insert_with<F: FnOnce() -> V>(&mut self, key: K, default: F) -> &mut V {
        let handle = match self.raw.search(&key) {
            Some(handle) => handle,
            None => self.raw.insert(key, default()).0,
        };
        &mut self.raw.node_mut(handle).value
    }

    /// Returns the value under `key`, inserting `V::default()` first if the key
    /// is absent.
    pub fn get_or_insert_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        self.get_or_insert_with(key, V::default)
    }
}

impl<K, V, C, G: LevelGenerator> SkipListMap<K, V, C, G> {
    /// Returns a reference to the value corresponding to the key.
    ///
    /// The key may be any borrowed form of the map's key type that the
    /// comparator can order.
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
    /// map.insert(1, "a");
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// assert_eq!(map.get(&2), None);
    /// ```
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        let handle = self.raw.search(key)?;
        Some(&self.raw.node(handle).value)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        let handle = self.raw.search(key)?;
        Some(&mut self.raw.node_mut(handle).value)
    }

    /// Returns the stored key and its value.
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.raw.search(key).map(|h| self.entry_at(h))
    }

    /// Returns `true` if the map contains a value for the specified key.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.raw.search(key).is_some()
    }

    /// Returns the value under `key`, or [`Error::KeyNotFound`].
    ///
    /// # Errors
    ///
    /// [`Error::KeyNotFound`] if the key is absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_maps::{Error, SkipListMap};
    ///
    /// let map = SkipListMap::from([(1, "a")]);
    /// assert_eq!(map.at(&1), Ok(&"a"));
    /// assert_eq!(map.at(&2), Err(Error::KeyNotFound));
    /// ```
    pub fn at<Q>(&self, key: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.get(key).ok_or(Error::KeyNotFound)
    }

    /// Returns a cursor positioned at `key`, or `None` if the key is absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_maps::SkipListMap;
    ///
    /// let map = SkipListMap::from([(1, "a"), (2, "b"), (3, "c")]);
    /// let rest: Vec<_> = map.find(&2).unwrap().map(|(k, _)| *k).collect();
    /// assert_eq!(rest, [2, 3]);
    /// assert!(map.find(&4).is_none());
    /// ```
    pub fn find<Q>(&self, key: &Q) -> Option<Cursor<'_, K, V>>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        let handle = self.raw.search(key)?;
        Some(self.cursor_at(Some(handle)))
    }

    /// Removes a key from the map, returning its value if it was present.
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
    /// map.insert(1, "a");
    /// assert_eq!(map.remove(&1), Some("a"));
    /// assert_eq!(map.remove(&1), None);
    /// ```
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.raw.remove(key).map(|(_, v)| v)
    }

    /// Removes a key from the map, returning the stored key and value.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.raw.remove(key)
    }
}

impl<'a, K, V> Cursor<'a, K, V> {
    /// The entry under the cursor, or `None` at the end.
    #[must_use]
    pub fn key_value(&self) -> Option<(&'a K, &'a V)> {
        let node = self.nodes.get(self.current?);
        Some((&node.key, &node.value))
    }

    #[must_use]
    pub fn key(&self) -> Option<&'a K> {
        self.key_value().map(|(k, _)| k)
    }

    #[must_use]
    pub fn value(&self) -> Option<&'a V> {
        self.key_value().map(|(_, v)| v)
    }

    /// Steps to the following entry. Does nothing at the end.
    pub fn move_next(&mut self) {
        if let Some(current) = self.current {
            self.current = self.nodes.get(current).next();
        }
    }

    /// Returns `true` once the cursor has moved past the last entry.
    #[must_use]
    pub const fn is_end(&self) -> bool {
        self.current.is_none()
    }
}

impl<'a, K, V> Iterator for Cursor<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.key_value()?;
        self.move_next();
        Some(entry)
    }
}

impl<K, V> FusedIterator for Cursor<'_, K, V> {}

impl<K, V> Clone for Cursor<'_, K, V> {
    fn clone(&self) -> Self {
        Cursor {
            nodes: self.nodes,
            current: self.current,
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Cursor<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Cursor").field(&self.key_value()).finish()
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        self.cursor.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            cursor: self.cursor.clone(),
            remaining: self.remaining,
        }
    }
}

impl<K, V> fmt::Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter").field("remaining", &self.remaining).finish()
    }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for Keys<'_, K, V> {}

impl<K, V> Clone for Keys<'_, K, V> {
    fn clone(&self) -> Self {
        Keys {
            inner: self.inner.clone(),
        }
    }
}

impl<K, V> fmt::Debug for Keys<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keys").field("remaining", &self.inner.remaining).finish()
    }
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for Values<'_, K, V> {}

impl<K, V> Clone for Values<'_, K, V> {
    fn clone(&self) -> Self {
        Values {
            inner: self.inner.clone(),
        }
    }
}

impl<K, V> fmt::Debug for Values<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Values").field("remaining", &self.inner.remaining).finish()
    }
}

/// Deep copy: every entry is re-inserted into a fresh list, so the copy shares
/// no nodes with the original and draws its own node heights.
impl<K, V, C, G> Clone for SkipListMap<K, V, C, G>
where
    K: Clone,
    V: Clone,
    C: Comparator<K> + Clone,
    G: LevelGenerator + Clone,
{
    fn clone(&self) -> Self {
        tracing::debug!(len = self.len(), "deep-copying skip list");
        let mut copy = SkipListMap::with_generator(self.comparator().clone(), self.raw.levels().clone());
        for (k, v) in self {
            copy.insert(k.clone(), v.clone());
        }
        copy
    }
}

impl<K: PartialEq, V: PartialEq, C, G: LevelGenerator> PartialEq for SkipListMap<K, V, C, G> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<K: Eq, V: Eq, C, G: LevelGenerator> Eq for SkipListMap<K, V, C, G> {}

impl<K: fmt::Debug, V: fmt::Debug, C, G: LevelGenerator> fmt::Debug for SkipListMap<K, V, C, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, C: Default, G: LevelGenerator + Default> Default for SkipListMap<K, V, C, G> {
    fn default() -> Self {
        SkipListMap::with_generator(C::default(), G::default())
    }
}

impl<K, V, C, G> FromIterator<(K, V)> for SkipListMap<K, V, C, G>
where
    C: Comparator<K> + Default,
    G: LevelGenerator + Default,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = SkipListMap::default();
        map.extend(iter);
        map
    }
}

impl<K, V, C: Comparator<K>, G: LevelGenerator> Extend<(K, V)> for SkipListMap<K, V, C, G> {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<'a, K, V, C, G: LevelGenerator> IntoIterator for &'a SkipListMap<K, V, C, G> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<K, Q, V, C, G> Index<&Q> for SkipListMap<K, V, C, G>
where
    K: Borrow<Q>,
    Q: ?Sized,
    C: Comparator<Q>,
    G: LevelGenerator,
{
    type Output = V;

    /// Returns a reference to the value corresponding to the supplied key.
    ///
    /// # Panics
    ///
    /// Panics if the key is not present in the map.
    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

impl<K: Ord, V, const N: usize> From<[(K, V); N]> for SkipListMap<K, V> {
    fn from(arr: [(K, V); N]) -> Self {
        arr.into_iter().collect()
    }
}
