/// Failures reported by the explicit fail-fast accessors.
///
/// Ordinary lookups never produce these: a missing key or an out-of-range rank
/// is reported as `None` (or `false` from `erase`). Only
/// [`OrderedRankMap::at`](crate::OrderedRankMap::at) and
/// [`OrderedRankMap::try_get_by_rank`](crate::OrderedRankMap::try_get_by_rank)
/// return an `Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("key not found")]
    KeyNotFound,

    #[error("rank {rank} out of range for map of length {len} (ranks start at 1)")]
    RankOutOfRange { rank: usize, len: usize },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
