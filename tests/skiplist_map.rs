use std::collections::BTreeMap;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use ranked_maps::skiplist_map::{self, SkipListOptions};
use ranked_maps::{Ascending, Descending, Error, Rank, SkipListMap};

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 2_000;

/// Keys drawn from a range smaller than `TEST_SIZE` so that sequences collide.
fn key_strategy() -> impl Strategy<Value = i64> {
    -1_000i64..1_000i64
}

fn value_strategy() -> impl Strategy<Value = i64> {
    any::<i64>()
}

fn seeded(seed: u64) -> SkipListMap<i64, i64> {
    SkipListMap::with_options(SkipListOptions::new().with_seed(seed), Ascending)
}

// ─── Operations enum for driving randomized tests ────────────────────────────

#[derive(Debug, Clone)]
enum MapOp {
    Insert(i64, i64),
    Remove(i64),
    Get(i64),
    ContainsKey(i64),
    RankOf(i64),
    GetByRank(usize),
    FirstKeyValue,
    LastKeyValue,
}

fn map_op_strategy() -> impl Strategy<Value = MapOp> {
    prop_oneof![
        5 => (key_strategy(), value_strategy()).prop_map(|(k, v)| MapOp::Insert(k, v)),
        3 => key_strategy().prop_map(MapOp::Remove),
        2 => key_strategy().prop_map(MapOp::Get),
        1 => key_strategy().prop_map(MapOp::ContainsKey),
        1 => key_strategy().prop_map(MapOp::RankOf),
        1 => (0usize..1_200).prop_map(MapOp::GetByRank),
        1 => Just(MapOp::FirstKeyValue),
        1 => Just(MapOp::LastKeyValue),
    ]
}

// ─── Core operations against BTreeMap ────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Replays a random sequence of operations on both SkipListMap and
    /// BTreeMap and asserts identical results at every step.
    #[test]
    fn map_ops_match_btreemap(seed in any::<u64>(), ops in proptest::collection::vec(map_op_strategy(), TEST_SIZE)) {
        let mut sl_map = seeded(seed);
        let mut bt_map: BTreeMap<i64, i64> = BTreeMap::new();

        for op in &ops {
            match op {
                MapOp::Insert(k, v) => {
                    prop_assert_eq!(sl_map.insert(*k, *v), bt_map.insert(*k, *v), "insert({}, {})", k, v);
                }
                MapOp::Remove(k) => {
                    prop_assert_eq!(sl_map.remove(k), bt_map.remove(k), "remove({})", k);
                }
                MapOp::Get(k) => {
                    prop_assert_eq!(sl_map.get(k), bt_map.get(k), "get({})", k);
                }
                MapOp::ContainsKey(k) => {
                    prop_assert_eq!(sl_map.contains_key(k), bt_map.contains_key(k), "contains_key({})", k);
                }
                MapOp::RankOf(k) => {
                    let expected = bt_map.range(..=*k).count();
                    let expected = bt_map.contains_key(k).then_some(expected);
                    prop_assert_eq!(sl_map.rank_of(k), expected, "rank_of({})", k);
                }
                MapOp::GetByRank(rank) => {
                    let expected = rank.checked_sub(1).and_then(|index| bt_map.iter().nth(index));
                    prop_assert_eq!(sl_map.get_by_rank(*rank), expected, "get_by_rank({})", rank);
                }
                MapOp::FirstKeyValue => {
                    prop_assert_eq!(sl_map.first_key_value(), bt_map.first_key_value());
                }
                MapOp::LastKeyValue => {
                    prop_assert_eq!(sl_map.last_key_value(), bt_map.last_key_value());
                }
            }
            prop_assert_eq!(sl_map.len(), bt_map.len());
        }

        prop_assert!(sl_map.iter().eq(bt_map.iter()));
    }

    /// Iteration order, lengths, keys and values match BTreeMap.
    #[test]
    fn iter_matches_btreemap(entries in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE)) {
        let sl_map: SkipListMap<i64, i64> = entries.iter().copied().collect();
        let bt_map: BTreeMap<i64, i64> = entries.iter().copied().collect();

        prop_assert_eq!(sl_map.iter().len(), bt_map.len());
        prop_assert!(sl_map.iter().eq(bt_map.iter()));
        prop_assert!(sl_map.keys().eq(bt_map.keys()));
        prop_assert!(sl_map.values().eq(bt_map.values()));
        prop_assert!(sl_map.cursor_front().eq(bt_map.iter()));
    }

    /// Removing every key, in insertion order, leaves an empty list.
    #[test]
    fn drain_by_remove(entries in proptest::collection::vec(key_strategy(), 1..TEST_SIZE)) {
        let mut sl_map: SkipListMap<i64, ()> = entries.iter().map(|&k| (k, ())).collect();
        for k in &entries {
            sl_map.remove(k);
        }
        prop_assert!(sl_map.is_empty());
        prop_assert_eq!(sl_map.height(), 0);
        prop_assert_eq!(sl_map.first_key_value(), None);
        prop_assert_eq!(sl_map.last_key_value(), None);
    }

    #[test]
    fn get_mut_matches_btreemap(
        entries in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE),
        probes in proptest::collection::vec(key_strategy(), 100),
    ) {
        let mut sl_map: SkipListMap<i64, i64> = entries.iter().copied().collect();
        let mut bt_map: BTreeMap<i64, i64> = entries.iter().copied().collect();

        for k in &probes {
            if let Some(v) = sl_map.get_mut(k) {
                *v = v.wrapping_add(1);
            }
            if let Some(v) = bt_map.get_mut(k) {
                *v = v.wrapping_add(1);
            }
        }
        prop_assert!(sl_map.iter().eq(bt_map.iter()));
    }

    #[test]
    fn clone_produces_equal_map(entries in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE)) {
        let sl_map: SkipListMap<i64, i64> = entries.iter().copied().collect();
        let copy = sl_map.clone();
        prop_assert_eq!(&copy, &sl_map);
        prop_assert_eq!(copy.len(), sl_map.len());
    }
}

// ─── Order statistics ────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Tests get_by_rank and find_by_rank against a sorted Vec oracle.
    #[test]
    fn get_by_rank_matches_vec(entries in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE)) {
        let sl_map: SkipListMap<i64, i64> = entries.iter().copied().collect();
        let sorted: Vec<(i64, i64)> = BTreeMap::from_iter(entries.iter().copied()).into_iter().collect();

        for (index, (k, v)) in sorted.iter().enumerate() {
            let rank = index + 1;
            prop_assert_eq!(sl_map.get_by_rank(rank), Some((k, v)), "get_by_rank({})", rank);
            let found = sl_map.find_by_rank(rank).and_then(|cursor| cursor.key_value());
            prop_assert_eq!(found, Some((k, v)), "find_by_rank({})", rank);
        }

        prop_assert_eq!(sl_map.get_by_rank(0), None);
        prop_assert_eq!(sl_map.get_by_rank(sorted.len() + 1), None);
        prop_assert!(sl_map.find_by_rank(0).is_none());
        prop_assert!(sl_map.find_by_rank(sorted.len() + 1).is_none());
    }

    #[test]
    fn rank_of_get_by_rank_roundtrip(entries in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE)) {
        let sl_map: SkipListMap<i64, i64> = entries.iter().copied().collect();

        for rank in 1..=sl_map.len() {
            let (k, _) = sl_map.get_by_rank(rank).unwrap();
            prop_assert_eq!(sl_map.rank_of(k), Some(rank), "roundtrip rank mismatch at rank {}", rank);
        }
    }

    /// Tests Index<Rank> and IndexMut<Rank>.
    #[test]
    fn index_by_rank_matches_vec(entries in proptest::collection::vec((key_strategy(), value_strategy()), 1..TEST_SIZE)) {
        let mut sl_map: SkipListMap<i64, i64> = entries.iter().copied().collect();
        let sorted: Vec<(i64, i64)> = BTreeMap::from_iter(entries.iter().copied()).into_iter().collect();

        for (index, (_, v)) in sorted.iter().enumerate() {
            prop_assert_eq!(sl_map[Rank(index + 1)], *v, "Index[Rank({})]", index + 1);
        }

        sl_map[Rank(1)] = 42;
        prop_assert_eq!(sl_map.first_key_value().map(|(_, v)| *v), Some(42));
    }

    /// Small maximum levels still give correct answers, only slower ones.
    #[test]
    fn max_level_does_not_change_results(
        max_level in 1usize..=6,
        seed in any::<u64>(),
        entries in proptest::collection::vec(key_strategy(), 0..500),
    ) {
        let options = SkipListOptions::new().with_max_level(max_level).with_seed(seed);
        let mut sl_map = SkipListMap::with_options(options, Descending);
        for &k in &entries {
            sl_map.insert(k, ());
        }
        prop_assert!(sl_map.height() <= max_level);

        let mut expected: Vec<i64> = entries.clone();
        expected.sort_unstable_by(|a, b| b.cmp(a));
        expected.dedup();
        prop_assert!(sl_map.keys().eq(expected.iter()));
        for (index, k) in expected.iter().enumerate() {
            prop_assert_eq!(sl_map.rank_of(k), Some(index + 1));
        }
    }
}

// ─── Scenarios ───────────────────────────────────────────────────────────────

const SCENARIO: [i32; 9] = [3, 5, 2, 9, 8, 7, 1, 4, 6];

#[test]
fn ascending_scenario() {
    let mut map = SkipListMap::new();
    for key in SCENARIO {
        map.insert(key, key * 100);
    }

    assert_eq!(map.keys().copied().collect::<Vec<_>>(), (1..=9).collect::<Vec<_>>());
    assert_eq!(map.find_by_rank(5).and_then(|c| c.key()), Some(&5));

    assert_eq!(map.remove(&5), Some(500));
    assert_eq!(map.len(), 8);
    assert!(map.find(&5).is_none());
    assert_eq!(map.find_by_rank(5).and_then(|c| c.key()), Some(&6));
}

#[test]
fn descending_scenario() {
    let mut map = SkipListMap::with_comparator(Descending);
    for key in SCENARIO {
        map.insert(key, ());
    }

    assert_eq!(map.keys().copied().collect::<Vec<_>>(), (1..=9).rev().collect::<Vec<_>>());
    assert_eq!(map.cursor_front().key(), Some(&9));
    assert_eq!(map.last_key_value(), Some((&1, &())));
    assert_eq!(map.get_by_rank(1), Some((&9, &())));
}

#[test]
fn reinsert_updates_without_growing() {
    let mut map = SkipListMap::new();
    map.insert("k", 1);
    assert_eq!(map.insert("k", 2), Some(1));
    assert_eq!(map.len(), 1);
    assert_eq!(map.get(&"k"), Some(&2));
}

#[test]
fn erase_of_absent_key_is_a_no_op() {
    let mut map: SkipListMap<_, _> = (0..10).map(|i| (i, i)).collect();
    assert_eq!(map.remove(&42), None);
    assert_eq!(map.len(), 10);
}

#[test]
fn deep_copy_is_independent() {
    let mut original: SkipListMap<_, _> = SCENARIO.iter().map(|&k| (k, vec![k])).collect();
    let copy = original.clone();

    original.remove(&1);
    original.get_mut(&2).unwrap().push(20);
    original.insert(10, vec![10]);

    assert_eq!(copy.len(), 9);
    assert_eq!(copy.get(&1), Some(&vec![1]));
    assert_eq!(copy.get(&2), Some(&vec![2]));
    assert_eq!(copy.get(&10), None);
    assert_eq!(copy.get_by_rank(1), Some((&1, &vec![1])));
}

#[test]
fn fail_fast_accessors() {
    let map = SkipListMap::from([(1, "one")]);
    assert_eq!(map.at(&1), Ok(&"one"));
    assert_eq!(map.at(&2), Err(Error::KeyNotFound));
    assert_eq!(map.try_get_by_rank(2), Err(Error::RankOutOfRange { rank: 2, len: 1 }));
}

#[test]
fn get_or_insert_default_inserts_once() {
    let mut map: SkipListMap<&str, usize> = SkipListMap::new();
    for word in "the cat saw the other cat".split(' ') {
        *map.get_or_insert_default(word) += 1;
    }
    assert_eq!(
        map.iter().map(|(k, v)| (*k, *v)).collect::<Vec<_>>(),
        [("cat", 2), ("other", 1), ("saw", 1), ("the", 2)]
    );
}

#[test]
fn seeded_maps_share_a_layout() {
    let options = SkipListOptions::new().with_seed(2024);
    let mut a = SkipListMap::with_options(options, Ascending);
    let mut b = SkipListMap::with_options(options, Ascending);
    for key in 0..1_000 {
        a.insert(key, ());
        b.insert(key, ());
    }
    assert_eq!(a.height(), b.height());
    assert!(a.height() <= skiplist_map::DEFAULT_MAX_LEVEL);
}

#[test]
fn empty_map_is_well_formed() {
    let map: SkipListMap<i32, i32> = SkipListMap::default();
    assert!(map.is_empty());
    assert_eq!(map.height(), 0);
    assert_eq!(map.iter().size_hint(), (0, Some(0)));
    assert!(map.cursor_front().is_end());
    assert_eq!(map.get_by_rank(1), None);
    assert_eq!(format!("{map:?}"), "{}");
}
