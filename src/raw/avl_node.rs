use super::arena::Arena;
use super::handle::Handle;

pub(crate) struct AvlNode<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) left: Option<Handle>,
    pub(crate) right: Option<Handle>,
    /// Plain back-reference, never an owner.
    pub(crate) parent: Option<Handle>,
    /// Height of the subtree rooted here; a leaf has height 1.
    pub(crate) height: usize,
    /// Number of entries in the subtree rooted here.
    pub(crate) size: usize,
}

impl<K, V> AvlNode<K, V> {
    pub(crate) const fn leaf(key: K, value: V, parent: Option<Handle>) -> Self {
        Self {
            key,
            value,
            left: None,
            right: None,
            parent,
            height: 1,
            size: 1,
        }
    }
}

/// The leftmost node of the subtree rooted at `at`.
pub(crate) fn min_from<K, V>(nodes: &Arena<AvlNode<K, V>>, mut at: Handle) -> Handle {
    while let Some(left) = nodes.get(at).left {
        at = left;
    }
    at
}

/// The rightmost node of the subtree rooted at `at`.
pub(crate) fn max_from<K, V>(nodes: &Arena<AvlNode<K, V>>, mut at: Handle) -> Handle {
    while let Some(right) = nodes.get(at).right {
        at = right;
    }
    at
}

/// The in-order successor of `at`.
pub(crate) fn successor<K, V>(nodes: &Arena<AvlNode<K, V>>, at: Handle) -> Option<Handle> {
    if let Some(right) = nodes.get(at).right {
        return Some(min_from(nodes, right));
    }

    let mut child = at;
    let mut parent = nodes.get(at).parent;
    while let Some(p) = parent {
        if nodes.get(p).left == Some(child) {
            return Some(p);
        }
        child = p;
        parent = nodes.get(p).parent;
    }
    None
}

/// The in-order predecessor of `at`: the maximum of its left subtree when it
/// has one, otherwise the nearest ancestor reached from a right child.
pub(crate) fn predecessor<K, V>(nodes: &Arena<AvlNode<K, V>>, at: Handle) -> Option<Handle> {
    if let Some(left) = nodes.get(at).left {
        return Some(max_from(nodes, left));
    }

    let mut child = at;
    let mut parent = nodes.get(at).parent;
    while let Some(p) = parent {
        if nodes.get(p).right == Some(child) {
            return Some(p);
        }
        child = p;
        parent = nodes.get(p).parent;
    }
    None
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    /// Builds, by hand, the tree
    ///
    /// ```text
    ///         4
    ///       /   \
    ///      2     6
    ///     / \   /
    ///    1   3 5
    /// ```
    fn sample() -> (Arena<AvlNode<i32, ()>>, Vec<Handle>) {
        let mut nodes = Arena::new();
        let handles: Vec<Handle> = (0..=6).map(|k| nodes.alloc(AvlNode::leaf(k, (), None))).collect();
        let link = |nodes: &mut Arena<AvlNode<i32, ()>>, parent: usize, child: usize, left: bool| {
            if left {
                nodes.get_mut(handles[parent]).left = Some(handles[child]);
            } else {
                nodes.get_mut(handles[parent]).right = Some(handles[child]);
            }
            nodes.get_mut(handles[child]).parent = Some(handles[parent]);
        };
        link(&mut nodes, 4, 2, true);
        link(&mut nodes, 4, 6, false);
        link(&mut nodes, 2, 1, true);
        link(&mut nodes, 2, 3, false);
        link(&mut nodes, 6, 5, true);
        (nodes, handles)
    }

    #[test]
    fn extremes() {
        let (nodes, h) = sample();
        assert_eq!(min_from(&nodes, h[4]), h[1]);
        assert_eq!(max_from(&nodes, h[4]), h[6]);
        assert_eq!(max_from(&nodes, h[2]), h[3]);
    }

    #[test]
    fn forward_walk_is_in_order() {
        let (nodes, h) = sample();
        let mut keys = Vec::new();
        let mut at = Some(min_from(&nodes, h[4]));
        while let Some(handle) = at {
            keys.push(nodes.get(handle).key);
            at = successor(&nodes, handle);
        }
        assert_eq!(keys, [1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn backward_walk_is_in_order() {
        let (nodes, h) = sample();
        let mut keys = Vec::new();
        let mut at = Some(max_from(&nodes, h[4]));
        while let Some(handle) = at {
            keys.push(nodes.get(handle).key);
            at = predecessor(&nodes, handle);
        }
        assert_eq!(keys, [6, 5, 4, 3, 2, 1]);
    }

    #[test]
    fn predecessor_with_left_subtree_is_its_maximum() {
        let (nodes, h) = sample();
        // 4 has a left subtree {1, 2, 3}; its predecessor is 3, not 2.
        assert_eq!(predecessor(&nodes, h[4]), Some(h[3]));
        assert_eq!(predecessor(&nodes, h[6]), Some(h[5]));
    }
}
