//! Key ordering strategies.
//!
//! A map is parameterised by a [`Comparator`] chosen at construction time and
//! stored by value. The ordering it defines decides iteration direction, what
//! "first" and "last" mean, and which key has rank 1.

use std::cmp::Ordering;

/// A total order over `T`.
///
/// Implementations must be consistent: `compare(a, b)` is the reverse of
/// `compare(b, a)`, and the relation is transitive. A comparator that violates
/// this is a logic error; the map stays memory safe but its results are
/// unspecified.
///
/// # Examples
///
/// ```
/// use std::cmp::Ordering;
/// use ranked_maps::{Comparator, SkipListMap};
///
/// #[derive(Clone, Copy, Default)]
/// struct ByLength;
///
/// impl Comparator<str> for ByLength {
///     fn compare(&self, a: &str, b: &str) -> Ordering {
///         a.len().cmp(&b.len()).then_with(|| a.cmp(b))
///     }
/// }
///
/// impl Comparator<&str> for ByLength {
///     fn compare(&self, a: &&str, b: &&str) -> Ordering {
///         <Self as Comparator<str>>::compare(self, a, b)
///     }
/// }
///
/// let mut map = SkipListMap::with_comparator(ByLength);
/// map.insert("ccc", 3);
/// map.insert("a", 1);
/// map.insert("bb", 2);
/// let keys: Vec<_> = map.keys().copied().collect();
/// assert_eq!(keys, ["a", "bb", "ccc"]);
/// ```
pub trait Comparator<T: ?Sized> {
    /// Compares two keys.
    fn compare(&self, a: &T, b: &T) -> Ordering;

    /// Returns true if `a` sorts strictly before `b`.
    #[inline]
    fn precedes(&self, a: &T, b: &T) -> bool {
        self.compare(a, b) == Ordering::Less
    }
}

/// Smallest key first, following [`Ord`]. This is the default.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Ascending;

/// Largest key first, the reverse of [`Ord`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Descending;

impl<T: ?Sized + Ord> Comparator<T> for Ascending {
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

impl<T: ?Sized + Ord> Comparator<T> for Descending {
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        b.cmp(a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascending_follows_ord() {
        assert_eq!(Ascending.compare(&1, &2), Ordering::Less);
        assert_eq!(Ascending.compare(&2, &2), Ordering::Equal);
        assert!(Ascending.precedes(&"a", &"b"));
    }

    #[test]
    fn descending_reverses_ord() {
        assert_eq!(Descending.compare(&1, &2), Ordering::Greater);
        assert_eq!(Descending.compare(&2, &2), Ordering::Equal);
        assert!(Descending.precedes(&9, &1));
        assert!(!Descending.precedes(&1, &1));
    }

    #[test]
    fn unsized_keys_compare() {
        assert!(Ascending.precedes("abc", "abd"));
        assert!(Descending.precedes([3u8].as_slice(), [2u8, 9].as_slice()));
    }
}
