use std::borrow::Borrow;
use std::cmp::Ordering;

use super::arena::Arena;
use super::avl_node::{AvlNode, max_from, min_from};
use super::handle::Handle;
use crate::comparator::Comparator;

/// The AVL tree backing `AvlTreeMap`.
///
/// Every node records the height and entry count of its subtree. Heights keep
/// the tree balanced; counts answer rank queries on the way down.
pub(crate) struct RawAvlTree<K, V, C> {
    /// Arena storing every node.
    nodes: Arena<AvlNode<K, V>>,
    root: Option<Handle>,
    comparator: C,
}

impl<K, V, C> RawAvlTree<K, V, C> {
    pub(crate) const fn new(comparator: C) -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
            comparator,
        }
    }

    pub(crate) fn with_capacity(capacity: usize, comparator: C) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            root: None,
            comparator,
        }
    }

    pub(crate) const fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    pub(crate) const fn comparator(&self) -> &C {
        &self.comparator
    }

    pub(crate) fn nodes(&self) -> &Arena<AvlNode<K, V>> {
        &self.nodes
    }

    pub(crate) fn node(&self, handle: Handle) -> &AvlNode<K, V> {
        self.nodes.get(handle)
    }

    pub(crate) fn node_mut(&mut self, handle: Handle) -> &mut AvlNode<K, V> {
        self.nodes.get_mut(handle)
    }

    /// Height of the whole tree; 0 when empty.
    pub(crate) fn height(&self) -> usize {
        self.height_of(self.root)
    }

    pub(crate) fn first(&self) -> Option<Handle> {
        self.root.map(|root| min_from(&self.nodes, root))
    }

    pub(crate) fn last(&self) -> Option<Handle> {
        self.root.map(|root| max_from(&self.nodes, root))
    }

    pub(crate) fn clear(&mut self) {
        tracing::debug!(len = self.len(), "clearing AVL tree");
        self.nodes.clear();
        self.root = None;
    }

    #[inline]
    fn height_of(&self, at: Option<Handle>) -> usize {
        at.map_or(0, |h| self.nodes.get(h).height)
    }

    #[inline]
    fn size_of(&self, at: Option<Handle>) -> usize {
        at.map_or(0, |h| self.nodes.get(h).size)
    }

    /// Returns the entry at one-based `rank`.
    pub(crate) fn get_by_rank(&self, rank: usize) -> Option<Handle> {
        if rank == 0 || rank > self.len() {
            return None;
        }

        let mut at = self.root?;
        let mut remaining = rank;
        loop {
            let node = self.nodes.get(at);
            let here = self.size_of(node.left) + 1;
            at = match remaining.cmp(&here) {
                Ordering::Equal => return Some(at),
                Ordering::Less => node.left?,
                Ordering::Greater => {
                    remaining -= here;
                    node.right?
                }
            };
        }
    }

    /// Recomputes the cached height and size of `at` from its children.
    fn update(&mut self, at: Handle) {
        let node = self.nodes.get(at);
        let (left, right) = (node.left, node.right);
        let height = 1 + self.height_of(left).max(self.height_of(right));
        let size = 1 + self.size_of(left) + self.size_of(right);

        let node = self.nodes.get_mut(at);
        node.height = height;
        node.size = size;
    }

    /// Points whatever referenced `old` (its parent or the root) at `new` instead.
    fn replace_child(&mut self, parent: Option<Handle>, old: Handle, new: Option<Handle>) {
        match parent {
            None => self.root = new,
            Some(p) => {
                let parent = self.nodes.get_mut(p);
                if parent.left == Some(old) {
                    parent.left = new;
                } else {
                    debug_assert_eq!(parent.right, Some(old), "replace_child: {old:?} is not a child of {p:?}");
                    parent.right = new;
                }
            }
        }
    }

    /// Lifts `pivot`, the right child of `at`, into `at`'s place.
    fn rotate_left(&mut self, at: Handle, pivot: Handle) -> Handle {
        tracing::trace!(node = at.to_index(), "rotating left");
        let parent = self.nodes.get(at).parent;
        let inner = self.nodes.get(pivot).left;

        self.nodes.get_mut(at).right = inner;
        if let Some(inner) = inner {
            self.nodes.get_mut(inner).parent = Some(at);
        }
        self.nodes.get_mut(pivot).left = Some(at);
        self.nodes.get_mut(at).parent = Some(pivot);
        self.nodes.get_mut(pivot).parent = parent;
        self.replace_child(parent, at, Some(pivot));

        self.update(at);
        self.update(pivot);
        pivot
    }

    /// Lifts `pivot`, the left child of `at`, into `at`'s place.
    fn rotate_right(&mut self, at: Handle, pivot: Handle) -> Handle {
        tracing::trace!(node = at.to_index(), "rotating right");
        let parent = self.nodes.get(at).parent;
        let inner = self.nodes.get(pivot).right;

        self.nodes.get_mut(at).left = inner;
        if let Some(inner) = inner {
            self.nodes.get_mut(inner).parent = Some(at);
        }
        self.nodes.get_mut(pivot).right = Some(at);
        self.nodes.get_mut(at).parent = Some(pivot);
        self.nodes.get_mut(pivot).parent = parent;
        self.replace_child(parent, at, Some(pivot));

        self.update(at);
        self.update(pivot);
        pivot
    }

    /// Refreshes `at` and restores its balance. Returns the root of the subtree
    /// that now stands where `at` stood.
    fn rebalance(&mut self, at: Handle) -> Handle {
        self.update(at);

        let node = self.nodes.get(at);
        let (left, right) = (node.left, node.right);
        let (left_height, right_height) = (self.height_of(left), self.height_of(right));

        if let Some(left) = left
            && left_height > right_height + 1
        {
            let child = self.nodes.get(left);
            let (inner, outer) = (child.right, child.left);
            // Left-right: straighten the child first.
            let pivot = match inner {
                Some(inner) if self.height_of(Some(inner)) > self.height_of(outer) => self.rotate_left(left, inner),
                _ => left,
            };
            self.rotate_right(at, pivot)
        } else if let Some(right) = right
            && right_height > left_height + 1
        {
            let child = self.nodes.get(right);
            let (inner, outer) = (child.left, child.right);
            // Right-left.
            let pivot = match inner {
                Some(inner) if self.height_of(Some(inner)) > self.height_of(outer) => self.rotate_right(right, inner),
                _ => right,
            };
            self.rotate_left(at, pivot)
        } else {
            at
        }
    }

    /// Walks from `from` to the root, refreshing counts and rebalancing.
    fn retrace(&mut self, from: Option<Handle>) {
        let mut current = from;
        while let Some(at) = current {
            let top = self.rebalance(at);
            current = self.nodes.get(top).parent;
        }
    }

    /// Unlinks `target` and returns its entry.
    fn remove_at(&mut self, target: Handle) -> (K, V) {
        let node = self.nodes.get(target);

        // A node with two children trades entries with its successor, which has
        // no left child, and the successor's slot is removed instead.
        let doomed = match (node.left, node.right) {
            (Some(_), Some(right)) => {
                let successor = min_from(&self.nodes, right);
                let (target_node, successor_node) = self.nodes.get_pair_mut(target, successor);
                std::mem::swap(&mut target_node.key, &mut successor_node.key);
                std::mem::swap(&mut target_node.value, &mut successor_node.value);
                successor
            }
            _ => target,
        };

        let node = self.nodes.get(doomed);
        let (child, parent) = (node.left.or(node.right), node.parent);
        if let Some(child) = child {
            self.nodes.get_mut(child).parent = parent;
        }
        self.replace_child(parent, doomed, child);

        let removed = self.nodes.take(doomed);
        self.retrace(parent);
        (removed.key, removed.value)
    }
}

impl<K, V, C> RawAvlTree<K, V, C> {
    /// Returns the node whose key equals `key`.
    pub(crate) fn search<Q>(&self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        let mut at = self.root;
        while let Some(h) = at {
            let node = self.nodes.get(h);
            at = match self.comparator.compare(key, node.key.borrow()) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Some(h),
            };
        }
        None
    }

    /// Returns the one-based rank of `key`.
    pub(crate) fn rank_of<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        let mut at = self.root;
        let mut preceding = 0;
        while let Some(h) = at {
            let node = self.nodes.get(h);
            match self.comparator.compare(key, node.key.borrow()) {
                Ordering::Less => at = node.left,
                Ordering::Equal => return Some(preceding + self.size_of(node.left) + 1),
                Ordering::Greater => {
                    preceding += self.size_of(node.left) + 1;
                    at = node.right;
                }
            }
        }
        None
    }

    /// Removes `key` and returns its entry.
    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        let target = self.search(key)?;
        Some(self.remove_at(target))
    }

    /// Inserts a key-value pair.
    ///
    /// Returns the entry's handle and, if the key was already present, the value
    /// it replaced. Replacing a value leaves the shape of the tree untouched.
    pub(crate) fn insert(&mut self, key: K, value: V) -> (Handle, Option<V>)
    where
        C: Comparator<K>,
    {
        let Some(mut at) = self.root else {
            let handle = self.nodes.alloc(AvlNode::leaf(key, value, None));
            self.root = Some(handle);
            return (handle, None);
        };

        loop {
            let node = self.nodes.get(at);
            let ordering = self.comparator.compare(&key, &node.key);
            let child = match ordering {
                Ordering::Equal => {
                    let old = std::mem::replace(&mut self.nodes.get_mut(at).value, value);
                    return (at, Some(old));
                }
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
            };

            match child {
                Some(child) => at = child,
                None => {
                    let handle = self.nodes.alloc(AvlNode::leaf(key, value, Some(at)));
                    let parent = self.nodes.get_mut(at);
                    if ordering == Ordering::Less {
                        parent.left = Some(handle);
                    } else {
                        parent.right = Some(handle);
                    }
                    self.retrace(Some(at));
                    return (handle, None);
                }
            }
        }
    }
}
