//! Ordered maps with O(log n) access by rank.
//!
//! This crate provides two maps that keep their entries sorted by a
//! [`Comparator`] and can answer order-statistic queries:
//!
//! - [`SkipListMap`] - a probabilistic skip list whose links record how many
//!   entries they jump over (expected O(log n)).
//! - [`AvlTreeMap`] - a height-balanced binary search tree whose nodes count
//!   their subtree (worst case O(log n)).
//!
//! Both implement [`OrderedRankMap`], so code can be written once against
//! either engine:
//!
//! - [`get_by_rank`](SkipListMap::get_by_rank) - the entry at a given one-based position
//! - [`rank_of`](SkipListMap::rank_of) - the one-based position of a key
//! - Indexing by [`Rank`] - e.g., `map[Rank(1)]` for the first entry
//!
//! # Example
//!
//! ```
//! use ranked_maps::{AvlTreeMap, Descending, Rank, SkipListMap};
//!
//! let mut scores = SkipListMap::new();
//! scores.insert("Alice", 100);
//! scores.insert("Bob", 85);
//! scores.insert("Carol", 92);
//!
//! // The usual map operations.
//! assert_eq!(scores.get(&"Bob"), Some(&85));
//! assert_eq!(scores.len(), 3);
//!
//! // Order statistics: ranks are one-based.
//! let (name, score) = scores.get_by_rank(2).unwrap();
//! assert_eq!((*name, *score), ("Bob", 85));
//! assert_eq!(scores.rank_of(&"Carol"), Some(3));
//! assert_eq!(scores[Rank(1)], 100);
//!
//! // Leaderboard: highest score first.
//! let mut board = AvlTreeMap::with_comparator(Descending);
//! for (name, score) in &scores {
//!     board.insert(*score, *name);
//! }
//! assert_eq!(board[Rank(1)], "Alice");
//! assert_eq!(board.last_key_value(), Some((&85, &"Bob")));
//! ```
//!
//! # Errors
//!
//! Absence is not an error: lookups return `Option` and removals report
//! whether anything was removed. The fail-fast accessors
//! [`at`](OrderedRankMap::at) and
//! [`try_get_by_rank`](OrderedRankMap::try_get_by_rank) return [`Error`].
//!
//! # Logging
//!
//! Structural events (skip list height changes, AVL rotations, clears and deep
//! copies) are emitted through [`tracing`] at `trace` and `debug` level. The
//! crate never installs a subscriber.

// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod comparator;
mod error;
mod order_statistic;
mod raw;

pub mod avl_tree_map;
pub mod skiplist_map;

pub use avl_tree_map::AvlTreeMap;
pub use comparator::{Ascending, Comparator, Descending};
pub use error::{Error, Result};
pub use order_statistic::{OrderedRankMap, Rank};
pub use skiplist_map::SkipListMap;
