use smallvec::SmallVec;

use super::handle::Handle;

/// Upper bound on the number of levels any skip list may use.
pub(crate) const MAX_HEIGHT: usize = 32;

/// Most nodes stay on one or two levels; four covers ~94% of them inline.
pub(crate) const INLINE_LINKS: usize = 4;

/// A forward link on one level.
///
/// `span` counts the base-level positions from the owner of this link to its
/// destination, destination included. A link with no destination points at the
/// virtual end position `len + 1`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Link {
    pub(crate) next: Option<Handle>,
    pub(crate) span: usize,
}

impl Link {
    /// A link straight to the end of a list holding `len` entries, seen from the head.
    pub(crate) const fn to_end(len: usize) -> Self {
        Self { next: None, span: len + 1 }
    }
}

pub(crate) struct SkipNode<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    // links[i] is this node's forward link on level i; len() is the node's level count.
    pub(crate) links: SmallVec<[Link; INLINE_LINKS]>,
}

impl<K, V> SkipNode<K, V> {
    /// The following entry on the base level.
    #[inline]
    pub(crate) fn next(&self) -> Option<Handle> {
        self.links[0].next
    }

    #[cfg(test)]
    pub(crate) fn level_count(&self) -> usize {
        self.links.len()
    }
}
