use std::borrow::Borrow;
use std::fmt;
use std::iter::FusedIterator;
use std::ops::Index;

use crate::comparator::{Ascending, Comparator};
use crate::error::{Error, Result};
use crate::raw::{Arena, AvlNode, Handle, RawAvlTree, predecessor, successor};

mod order_statistic;

pub use crate::Rank;

/// An ordered map based on an [AVL tree] whose nodes count the entries beneath
/// them.
///
/// Entries are kept in the order defined by the map's [`Comparator`]
/// ([`Ascending`] unless another is chosen at construction). The tree stays
/// height-balanced after every insertion and removal, so lookups, updates and
/// the rank queries [`get_by_rank`](AvlTreeMap::get_by_rank) and
/// [`rank_of`](AvlTreeMap::rank_of) are O(log n) in the worst case. Ranks are
/// one-based.
///
/// It is a logic error for a key to be modified in such a way that its ordering
/// relative to any other key, as determined by the comparator, changes while it
/// is in the map.
///
/// # Examples
///
/// ```
/// use ranked_maps::{AvlTreeMap, Rank};
///
/// let mut latency = AvlTreeMap::new();
/// for (ms, request) in [(120, "c"), (15, "a"), (48, "b"), (300, "d")] {
///     latency.insert(ms, request);
/// }
///
/// // The slowest two, walking from the back.
/// let slowest: Vec<_> = latency.iter().rev().take(2).map(|(ms, _)| *ms).collect();
/// assert_eq!(slowest, [300, 120]);
///
/// // Second fastest by rank.
/// assert_eq!(latency[Rank(2)], "b");
/// assert_eq!(latency.rank_of(&300), Some(4));
/// ```
///
/// [AVL tree]: https://en.wikipedia.org/wiki/AVL_tree
pub struct AvlTreeMap<K, V, C = Ascending> {
    raw: RawAvlTree<K, V, C>,
}

/// A position in an [`AvlTreeMap`] that can move in both directions.
///
/// Iterating a cursor yields the entry it points at and then every following
/// entry. Cursors borrow the map, so they can never outlive a mutation.
pub struct Cursor<'a, K, V> {
    nodes: &'a Arena<AvlNode<K, V>>,
    current: Option<Handle>,
}

/// An iterator over the entries of an [`AvlTreeMap`], in comparator order.
///
/// This `struct` is created by the [`iter`] method on [`AvlTreeMap`].
///
/// [`iter`]: AvlTreeMap::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, K, V> {
    nodes: &'a Arena<AvlNode<K, V>>,
    front: Option<Handle>,
    back: Option<Handle>,
    remaining: usize,
}

/// An iterator over the keys of an [`AvlTreeMap`].
///
/// This `struct` is created by the [`keys`] method on [`AvlTreeMap`].
///
/// [`keys`]: AvlTreeMap::keys
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

/// An iterator over the values of an [`AvlTreeMap`].
///
/// This `struct` is created by the [`values`] method on [`AvlTreeMap`].
///
/// [`values`]: AvlTreeMap::values
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<K, V> AvlTreeMap<K, V> {
    /// Makes a new, empty `AvlTreeMap` in ascending key order.
    ///
    /// Does not allocate anything on its own.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_maps::AvlTreeMap;
    ///
    /// let mut map = AvlTreeMap::new();
    /// map.insert(1, "a");
    /// ```
    #[must_use]
    pub const fn new() -> Self {
        Self::with_comparator(Ascending)
    }

    /// Creates an empty map with room for at least `capacity` entries.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_maps::AvlTreeMap;
    ///
    /// let map: AvlTreeMap<i32, i32> = AvlTreeMap::with_capacity(32);
    /// assert!(map.capacity() >= 32);
    /// ```
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        AvlTreeMap {
            raw: RawAvlTree::with_capacity(capacity, Ascending),
        }
    }
}

impl<K, V, C> AvlTreeMap<K, V, C> {
    /// Makes a new, empty `AvlTreeMap` ordered by `comparator`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_maps::{AvlTreeMap, Descending};
    ///
    /// let mut map = AvlTreeMap::with_comparator(Descending);
    /// map.extend([(1, 'a'), (3, 'c'), (2, 'b')]);
    /// assert_eq!(map.first_key_value(), Some((&3, &'c')));
    /// ```
    #[must_use]
    pub const fn with_comparator(comparator: C) -> Self {
        AvlTreeMap {
            raw: RawAvlTree::new(comparator),
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

    /// Height of the tree; 0 for an empty map, 1 for a single entry.
    #[must_use]
    pub fn height(&self) -> usize {
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

    /// Removes every entry. The comparator is kept.
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Returns the first entry in comparator order.
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.raw.first().map(|h| self.entry_at(h))
    }

    /// Returns the last entry in comparator order.
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
    /// let map = AvlTreeMap::from([(1, "b"), (2, "a")]);
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

    /// A cursor at the last entry, at the end when the map is empty.
    pub fn cursor_back(&self) -> Cursor<'_, K, V> {
        self.cursor_at(self.raw.last())
    }

    /// Gets a double-ended iterator over the entries of the map, in comparator
    /// order.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_maps::AvlTreeMap;
    ///
    /// let map = AvlTreeMap::from([(3, "c"), (2, "b"), (1, "a")]);
    /// let mut iter = map.iter();
    /// assert_eq!(iter.next(), Some((&1, &"a")));
    /// assert_eq!(iter.next_back(), Some((&3, &"c")));
    /// assert_eq!(iter.next(), Some((&2, &"b")));
    /// assert_eq!(iter.next_back(), None);
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            nodes: self.raw.nodes(),
            front: self.raw.first(),
            back: self.raw.last(),
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

impl<K, V, C: Comparator<K>> AvlTreeMap<K, V, C> {
    /// Inserts a key-value pair into the map.
    ///
    /// If the map did not have this key present, `None` is returned.
    ///
    /// If the map did have this key present, the value is updated and the old
    /// value is returned. The key and the shape of the tree are left untouched.
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
    /// assert_eq!(map.insert(37, "a"), None);
    /// assert_eq!(map.insert(37, "b"), Some("a"));
    /// assert_eq!(map[&37], "b");
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.raw.insert(key, value).1
    }

    /// Returns the value under `key`, inserting `default()` first if the key is
    /// absent.
    pub fn get_or_insert_with<F: FnOnce() -> V>(&mut self, key: K, default: F) -> &mut V {
        let handle = match self.raw.search(&key) {
            Some(handle) => handle,
            None => self.raw.insert(key, default()).0,
        };
        &mut self.raw.node_mut(handle).value
    }

    /// Returns the value under `key`, inserting `V::default()` first if the key
    /// is absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_maps::AvlTreeMap;
    ///
    /// let mut groups: AvlTreeMap<char, Vec<&str>> = AvlTreeMap::new();
    /// for word in ["apple", "bean", "avocado"] {
    ///     groups.get_or_insert_default(word.chars().next().unwrap()).push(word);
    /// }
    /// assert_eq!(groups[&'a'], ["apple", "avocado"]);
    /// assert_eq!(groups.len(), 2);
    /// ```
    pub fn get_or_insert_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        self.get_or_insert_with(key, V::default)
    }
}

impl<K, V, C> AvlTreeMap<K, V, C> {
    /// Returns a reference to the value corresponding to the key.
    ///
    /// # Complexity
    ///
    /// O(log n)
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
    /// use ranked_maps::{AvlTreeMap, Error};
    ///
    /// let map = AvlTreeMap::from([(1, "a")]);
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
    /// use ranked_maps::AvlTreeMap;
    ///
    /// let map = AvlTreeMap::from([(1, "a"), (2, "b"), (3, "c")]);
    /// let mut cursor = map.find(&2).unwrap();
    /// cursor.move_prev();
    /// assert_eq!(cursor.key(), Some(&1));
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
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use ranked_maps::AvlTreeMap;
    ///
    /// let mut map = AvlTreeMap::new();
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
            self.current = successor(self.nodes, current);
        }
    }

    /// Steps to the preceding entry. Moving back from the first entry reaches
    /// the end; at the end this does nothing.
    pub fn move_prev(&mut self) {
        if let Some(current) = self.current {
            self.current = predecessor(self.nodes, current);
        }
    }

    /// Returns `true` once the cursor has left the entries.
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

impl<'a, K, V> Iter<'a, K, V> {
    fn entry(&self, handle: Handle) -> (&'a K, &'a V) {
        let node = self.nodes.get(handle);
        (&node.key, &node.value)
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let front = self.front?;
        self.remaining -= 1;
        self.front = successor(self.nodes, front);
        Some(self.entry(front))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }

    fn last(mut self) -> Option<Self::Item> {
        self.next_back()
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let back = self.back?;
        self.remaining -= 1;
        self.back = predecessor(self.nodes, back);
        Some(self.entry(back))
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
            nodes: self.nodes,
            front: self.front,
            back: self.back,
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

impl<K, V> DoubleEndedIterator for Keys<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, _)| k)
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

impl<K, V> DoubleEndedIterator for Values<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, v)| v)
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

/// Deep copy: every entry is re-inserted, in order, into a fresh tree.
impl<K: Clone, V: Clone, C: Comparator<K> + Clone> Clone for AvlTreeMap<K, V, C> {
    fn clone(&self) -> Self {
        tracing::debug!(len = self.len(), "deep-copying AVL tree");
        let mut copy = AvlTreeMap {
            raw: RawAvlTree::with_capacity(self.len(), self.comparator().clone()),
        };
        for (k, v) in self {
            copy.insert(k.clone(), v.clone());
        }
        copy
    }
}

impl<K: PartialEq, V: PartialEq, C> PartialEq for AvlTreeMap<K, V, C> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<K: Eq, V: Eq, C> Eq for AvlTreeMap<K, V, C> {}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for AvlTreeMap<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, C: Default> Default for AvlTreeMap<K, V, C> {
    fn default() -> Self {
        AvlTreeMap::with_comparator(C::default())
    }
}

impl<K, V, C: Comparator<K> + Default> FromIterator<(K, V)> for AvlTreeMap<K, V, C> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = AvlTreeMap::default();
        map.extend(iter);
        map
    }
}

impl<K, V, C: Comparator<K>> Extend<(K, V)> for AvlTreeMap<K, V, C> {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<'a, K, V, C> IntoIterator for &'a AvlTreeMap<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<K, Q, V, C> Index<&Q> for AvlTreeMap<K, V, C>
where
    K: Borrow<Q>,
    Q: ?Sized,
    C: Comparator<Q>,
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

impl<K: Ord, V, const N: usize> From<[(K, V); N]> for AvlTreeMap<K, V> {
    fn from(arr: [(K, V); N]) -> Self {
        arr.into_iter().collect()
    }
}
