mod arena;
mod avl_node;
mod handle;
mod raw_avl_tree;
mod raw_skip_list;
mod skip_node;

pub(crate) use arena::Arena;
pub(crate) use avl_node::{AvlNode, predecessor, successor};
pub(crate) use handle::Handle;
pub(crate) use raw_avl_tree::RawAvlTree;
pub(crate) use raw_skip_list::RawSkipList;
pub(crate) use skip_node::SkipNode;
