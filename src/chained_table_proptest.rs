#![cfg(test)]

// Property tests for ChainedHashTable kept inside the crate so they can
// check chain-level invariants through crate-private helpers.

use crate::config::TableConfig;
use crate::strategy::Strategies;
use crate::table::ChainedHashTable;
use crate::TableError;
use proptest::prelude::*;
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::rc::Rc;

// Pool-indexed operations: indices shrink to earlier keys, pool length
// shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Put(usize, i32),
    Get(usize),
    Remove(usize),
    ContainsValue(i32),
    Rehash(usize),
    RemoveAll,
    Iterate,
    Walk,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=12).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let op = prop_oneof![
            6 => (idx.clone(), -20i32..20).prop_map(|(i, v)| OpI::Put(i, v)),
            2 => idx.clone().prop_map(OpI::Get),
            3 => idx.clone().prop_map(OpI::Remove),
            1 => (-20i32..20).prop_map(OpI::ContainsValue),
            1 => (0usize..40).prop_map(OpI::Rehash),
            1 => Just(OpI::RemoveAll),
            1 => Just(OpI::Iterate),
            1 => Just(OpI::Walk),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Releases recorded as ("key"|"value", item).
type ReleaseLog = Rc<RefCell<Vec<(&'static str, String)>>>;

fn logged_table(
    buckets: usize,
    config: TableConfig,
    strategies: Strategies<String, i32>,
) -> (ChainedHashTable<String, i32>, ReleaseLog) {
    let log: ReleaseLog = Rc::default();
    let (lk, lv) = (Rc::clone(&log), Rc::clone(&log));
    let strategies = strategies.with_release_hooks(
        move |k: String| lk.borrow_mut().push(("key", k)),
        move |v: i32| lv.borrow_mut().push(("value", v.to_string())),
    );
    let t = ChainedHashTable::from_parts(buckets, config, strategies).expect("valid table");
    (t, log)
}

fn run_against_model(
    sut: &mut ChainedHashTable<String, i32>,
    log: &ReleaseLog,
    pool: &[String],
    ops: Vec<OpI>,
) -> Result<(), TestCaseError> {
    let mut model: HashMap<String, i32> = HashMap::new();
    // Every (kind, item) the model expects to have been released.
    let mut released: Vec<(&'static str, String)> = Vec::new();

    for op in ops {
        match op {
            OpI::Put(i, v) => {
                let k = pool[i].clone();
                if let Some(old) = model.insert(k.clone(), v) {
                    released.push(("key", k.clone()));
                    released.push(("value", old.to_string()));
                }
                prop_assert!(sut.put(k.clone(), v).is_ok());
                prop_assert_eq!(sut.get(&k), Some(&v));
            }
            OpI::Get(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.get(k), model.get(k));
                prop_assert_eq!(sut.contains_key(k), model.contains_key(k));
            }
            OpI::Remove(i) => {
                let k = pool[i].clone();
                let before = sut.len();
                let removed = sut.remove(&k);
                match model.remove(&k) {
                    Some(old) => {
                        prop_assert!(removed);
                        prop_assert_eq!(sut.len(), before - 1);
                        released.push(("key", k.clone()));
                        released.push(("value", old.to_string()));
                    }
                    None => {
                        prop_assert!(!removed);
                        prop_assert_eq!(sut.len(), before);
                    }
                }
                prop_assert!(sut.get(&k).is_none());
            }
            OpI::ContainsValue(v) => {
                prop_assert_eq!(sut.contains_value(&v), model.values().any(|x| *x == v));
            }
            OpI::Rehash(n) => {
                let before = sut.bucket_count();
                sut.rehash(n);
                if n != 0 {
                    prop_assert_eq!(sut.bucket_count(), n);
                } else {
                    prop_assert!(sut.bucket_count() >= 5);
                }
                if n == before {
                    prop_assert_eq!(sut.bucket_count(), before);
                }
            }
            OpI::RemoveAll => {
                for (k, v) in model.drain() {
                    released.push(("key", k));
                    released.push(("value", v.to_string()));
                }
                sut.remove_all();
                prop_assert!(sut.is_empty());
                prop_assert_eq!(sut.bucket_count(), 5);
            }
            OpI::Iterate => {
                let seen: BTreeMap<String, i32> =
                    sut.iter().map(|(k, v)| (k.clone(), *v)).collect();
                prop_assert_eq!(sut.iter().count(), model.len());
                let expected: BTreeMap<String, i32> =
                    model.iter().map(|(k, v)| (k.clone(), *v)).collect();
                prop_assert_eq!(seen, expected);
            }
            OpI::Walk => {
                let mut walked = Vec::new();
                let mut step = sut.first();
                while let Some((cursor, k, v)) = step {
                    walked.push((k.clone(), *v));
                    step = sut.next(cursor).map_err(|e| TestCaseError::fail(e.to_string()))?;
                }
                let from_iter: Vec<_> = sut.iter().map(|(k, v)| (k.clone(), *v)).collect();
                prop_assert_eq!(walked, from_iter);
            }
        }

        // Post-conditions after each op
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        prop_assert_eq!(sut.chain_lengths().iter().sum::<usize>(), sut.len());
        prop_assert!(sut.bucket_count() > 0);

        let mut got = log.borrow().clone();
        let mut want = released.clone();
        got.sort();
        want.sort();
        prop_assert_eq!(got, want, "release log diverged from model");
    }

    for k in model.keys() {
        prop_assert!(sut.contains_key(k));
    }
    Ok(())
}

// Property: state-machine equivalence against std::collections::HashMap.
// - put/get/remove/contains parity and len tracking after each op.
// - every overwritten or removed key/value is released exactly once.
// - rehash keeps the key/value set; cursor walk matches `iter` order.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario(), buckets in 1usize..16) {
        let (mut sut, log) = logged_table(buckets, TableConfig::default(), Strategies::standard());
        run_against_model(&mut sut, &log, &pool, ops)?;
    }

    // Low thresholds make automatic growth and shrinking fire constantly.
    #[test]
    fn prop_state_machine_with_eager_rehash((pool, ops) in arb_scenario()) {
        let config = TableConfig::default()
            .with_ideal_ratio(0.5)
            .with_lower_rehash_threshold(0.3)
            .with_upper_rehash_threshold(1.0);
        let (mut sut, log) = logged_table(5, config, Strategies::standard());
        run_against_model(&mut sut, &log, &pool, ops)?;
    }

    // Worst-case collisions: every key in one chain, resolved by equality.
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        let strategies = Strategies::new(
            |_: &String| 0u64,
            |a: &String, b: &String| a == b,
            |a: &i32, b: &i32| a == b,
        );
        let (mut sut, log) = logged_table(5, TableConfig::default(), strategies);
        run_against_model(&mut sut, &log, &pool, ops)?;
    }
}

proptest! {
    // Rehash to any bucket count preserves the full key/value set.
    #[test]
    fn prop_rehash_preserves_pairs(
        keys in proptest::collection::btree_set(any::<u32>(), 0..200),
        counts in proptest::collection::vec(0usize..300, 1..6),
    ) {
        let mut t: ChainedHashTable<u32, u64> = ChainedHashTable::new(5).unwrap();
        for &k in &keys {
            t.put(k, k as u64 * 3).unwrap();
        }
        for n in counts {
            t.rehash(n);
            let pairs: BTreeSet<(u32, u64)> = t.iter().map(|(k, v)| (*k, *v)).collect();
            let expected: BTreeSet<(u32, u64)> = keys.iter().map(|&k| (k, k as u64 * 3)).collect();
            prop_assert_eq!(pairs, expected);
            for &k in &keys {
                prop_assert_eq!(t.get(&k), Some(&(k as u64 * 3)));
            }
        }
    }

    // A cursor obtained before a fresh insert is always rejected.
    #[test]
    fn prop_cursor_rejected_after_insert(keys in proptest::collection::btree_set(0u32..1000, 1..50)) {
        let mut t: ChainedHashTable<u32, u32> = ChainedHashTable::new(5).unwrap();
        for &k in &keys {
            t.put(k, k).unwrap();
        }
        let (cursor, _, _) = t.first().expect("non-empty");
        t.put(1000, 0).unwrap();
        prop_assert_eq!(t.next(cursor), Err(TableError::StaleCursor));
    }
}
