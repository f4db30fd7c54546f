use std::borrow::Borrow;
use std::cmp::Ordering;

use smallvec::SmallVec;

use super::arena::Arena;
use super::handle::Handle;
use super::skip_node::{INLINE_LINKS, Link, MAX_HEIGHT, SkipNode};
use crate::comparator::Comparator;
use crate::skiplist_map::LevelGenerator;

/// Where a descent currently stands: on the head sentinel or on an entry.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Position {
    Head,
    Node(Handle),
}

/// Per-level result of walking down the list towards a key.
struct Descent {
    /// Last position on each level whose key precedes the target.
    update: [Position; MAX_HEIGHT],
    /// Base-level position (head = 0) of `update[level]`.
    rank: [usize; MAX_HEIGHT],
}

/// The skip list backing `SkipListMap`.
pub(crate) struct RawSkipList<K, V, C, G> {
    /// Arena storing every entry node.
    nodes: Arena<SkipNode<K, V>>,
    /// Links of the head sentinel, one per possible level.
    head: SmallVec<[Link; 16]>,
    /// Number of levels currently in use.
    height: usize,
    /// Number of entries.
    len: usize,
    /// The entry with no base-level successor.
    last: Option<Handle>,
    comparator: C,
    levels: G,
}

impl<K, V, C, G: LevelGenerator> RawSkipList<K, V, C, G> {
    pub(crate) fn new(comparator: C, levels: G) -> Self {
        Self::with_capacity(0, comparator, levels)
    }

    pub(crate) fn with_capacity(capacity: usize, comparator: C, levels: G) -> Self {
        let max_level = levels.max_level();
        assert!(
            (1..=MAX_HEIGHT).contains(&max_level),
            "`RawSkipList::new()` - max level {max_level} outside 1..={MAX_HEIGHT}!"
        );

        Self {
            nodes: Arena::with_capacity(capacity),
            head: std::iter::repeat_n(Link::to_end(0), max_level).collect(),
            height: 0,
            len: 0,
            last: None,
            comparator,
            levels,
        }
    }

    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    pub(crate) const fn height(&self) -> usize {
        self.height
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    pub(crate) const fn comparator(&self) -> &C {
        &self.comparator
    }

    pub(crate) const fn levels(&self) -> &G {
        &self.levels
    }

    pub(crate) fn nodes(&self) -> &Arena<SkipNode<K, V>> {
        &self.nodes
    }

    pub(crate) fn node(&self, handle: Handle) -> &SkipNode<K, V> {
        self.nodes.get(handle)
    }

    pub(crate) fn node_mut(&mut self, handle: Handle) -> &mut SkipNode<K, V> {
        self.nodes.get_mut(handle)
    }

    /// The first entry in comparator order.
    pub(crate) fn first(&self) -> Option<Handle> {
        self.head[0].next
    }

    /// The last entry in comparator order.
    pub(crate) const fn last(&self) -> Option<Handle> {
        self.last
    }

    pub(crate) fn clear(&mut self) {
        tracing::debug!(len = self.len, "clearing skip list");
        self.nodes.clear();
        self.head.iter_mut().for_each(|link| *link = Link::to_end(0));
        self.height = 0;
        self.len = 0;
        self.last = None;
    }

    #[inline]
    fn link(&self, at: Position, level: usize) -> Link {
        match at {
            Position::Head => self.head[level],
            Position::Node(h) => self.nodes.get(h).links[level],
        }
    }

    #[inline]
    fn link_mut(&mut self, at: Position, level: usize) -> &mut Link {
        match at {
            Position::Head => &mut self.head[level],
            Position::Node(h) => &mut self.nodes.get_mut(h).links[level],
        }
    }

    /// Returns the entry at one-based `rank`.
    pub(crate) fn get_by_rank(&self, rank: usize) -> Option<Handle> {
        if rank == 0 || rank > self.len {
            return None;
        }

        let mut at = Position::Head;
        let mut traversed = 0;
        for level in (0..self.height).rev() {
            loop {
                let link = self.link(at, level);
                match link.next {
                    Some(next) if traversed + link.span <= rank => {
                        traversed += link.span;
                        at = Position::Node(next);
                    }
                    _ => break,
                }
            }
            if traversed == rank
                && let Position::Node(h) = at
            {
                return Some(h);
            }
        }

        debug_assert!(false, "get_by_rank: span invariant violated - rank {rank} not reached (len: {})", self.len);
        None
    }
}

impl<K, V, C, G> RawSkipList<K, V, C, G>
where
    G: LevelGenerator,
{
    fn descend<Q>(&self, key: &Q) -> Descent
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        let mut update = [Position::Head; MAX_HEIGHT];
        let mut rank = [0; MAX_HEIGHT];

        let mut at = Position::Head;
        let mut traversed = 0;
        for level in (0..self.height).rev() {
            loop {
                let link = self.link(at, level);
                match link.next {
                    Some(next) if self.comparator.precedes(self.nodes.get(next).key.borrow(), key) => {
                        traversed += link.span;
                        at = Position::Node(next);
                    }
                    _ => break,
                }
            }
            update[level] = at;
            rank[level] = traversed;
        }

        Descent { update, rank }
    }

    /// Returns the entry whose key equals `key`.
    pub(crate) fn search<Q>(&self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        let mut at = Position::Head;
        for level in (0..self.height).rev() {
            while let Some(next) = self.link(at, level).next
                && self.comparator.precedes(self.nodes.get(next).key.borrow(), key)
            {
                at = Position::Node(next);
            }
        }

        let candidate = self.link(at, 0).next?;
        (self.comparator.compare(self.nodes.get(candidate).key.borrow(), key) == Ordering::Equal).then_some(candidate)
    }

    /// Returns the one-based rank of `key`.
    pub(crate) fn rank_of<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        let mut at = Position::Head;
        let mut traversed = 0;
        for level in (0..self.height).rev() {
            loop {
                let link = self.link(at, level);
                match link.next {
                    Some(next)
                        if self.comparator.compare(self.nodes.get(next).key.borrow(), key) != Ordering::Greater =>
                    {
                        traversed += link.span;
                        at = Position::Node(next);
                    }
                    _ => break,
                }
            }
            if let Position::Node(h) = at
                && self.comparator.compare(self.nodes.get(h).key.borrow(), key) == Ordering::Equal
            {
                return Some(traversed);
            }
        }
        None
    }

    /// Inserts a key-value pair.
    ///
    /// Returns the entry's handle and, if the key was already present, the value
    /// it replaced. Replacing a value leaves links and spans untouched.
    pub(crate) fn insert(&mut self, key: K, value: V) -> (Handle, Option<V>)
    where
        C: Comparator<K>,
    {
        let Descent { mut update, mut rank } = self.descend(&key);

        if let Some(next) = self.link(update[0], 0).next
            && self.comparator.compare(&self.nodes.get(next).key, &key) == Ordering::Equal
        {
            let old = std::mem::replace(&mut self.nodes.get_mut(next).value, value);
            return (next, Some(old));
        }

        let level = self.levels.random_level();
        assert!(
            (1..=self.head.len()).contains(&level),
            "`RawSkipList::insert()` - level generator returned {level}, outside 1..={}!",
            self.head.len()
        );
        if level > self.height {
            for i in self.height..level {
                update[i] = Position::Head;
                rank[i] = 0;
                self.head[i] = Link::to_end(self.len);
            }
            tracing::trace!(from = self.height, to = level, "raising skip list height");
            self.height = level;
        }

        // The new entry lands at base-level position rank[0] + 1.
        let links: SmallVec<[Link; INLINE_LINKS]> = (0..level)
            .map(|i| {
                let prev = self.link(update[i], i);
                Link {
                    next: prev.next,
                    span: prev.span - (rank[0] - rank[i]),
                }
            })
            .collect();
        let is_last = links[0].next.is_none();
        let handle = self.nodes.alloc(SkipNode { key, value, links });

        for i in 0..level {
            let consumed = rank[0] - rank[i];
            let prev = self.link_mut(update[i], i);
            prev.next = Some(handle);
            prev.span = consumed + 1;
        }
        // Levels above the new entry now skip over one more position.
        for i in level..self.height {
            self.link_mut(update[i], i).span += 1;
        }

        if is_last {
            self.last = Some(handle);
        }
        self.len += 1;
        (handle, None)
    }

    /// Removes `key` and returns its entry.
    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        let Descent { update, .. } = self.descend(key);

        let target = self.link(update[0], 0).next?;
        if self.comparator.compare(self.nodes.get(target).key.borrow(), key) != Ordering::Equal {
            return None;
        }

        for level in 0..self.height {
            let removed = self.nodes.get(target).links.get(level).copied();
            let prev = self.link_mut(update[level], level);
            match removed {
                Some(removed) if prev.next == Some(target) => {
                    prev.next = removed.next;
                    prev.span = prev.span + removed.span - 1;
                }
                _ => prev.span -= 1,
            }
        }

        let old_height = self.height;
        while self.height > 0 && self.head[self.height - 1].next.is_none() {
            self.height -= 1;
        }
        if self.height != old_height {
            tracing::trace!(from = old_height, to = self.height, "lowering skip list height");
        }

        if self.last == Some(target) {
            self.last = match update[0] {
                Position::Head => None,
                Position::Node(h) => Some(h),
            };
        }

        self.len -= 1;
        let node = self.nodes.take(target);
        Some((node.key, node.value))
    }
}
