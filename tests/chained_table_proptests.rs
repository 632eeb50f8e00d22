// ChainedHashTable property tests (public API).
//
// Property 1: after any sequence of puts, len() == number of distinct keys,
//  and get returns the last value put for each key.
// Property 2: automatic growth only ever lands on counts produced by
//  `ideal_bucket_count`, which are odd, >= 5 and pass the prime heuristic.
// Property 3: the cursor protocol and `iter` visit the same len() pairs in
//  the same order.
// Property 4: the capability object and the concrete table agree on every
//  observable after the same operation sequence.
use chained_hashtable::rehash::{ideal_bucket_count, is_probable_prime};
use chained_hashtable::{ChainedHashTable, ContainerFactory};
use proptest::prelude::*;
use std::collections::HashMap;

proptest! {
    #[test]
    fn prop_len_is_distinct_keys(puts in proptest::collection::vec((0u16..200, any::<i64>()), 0..400)) {
        let mut t: ChainedHashTable<u16, i64> = ChainedHashTable::new(5).unwrap();
        let mut last: HashMap<u16, i64> = HashMap::new();
        for (k, v) in puts {
            t.put(k, v).unwrap();
            last.insert(k, v);
        }
        prop_assert_eq!(t.len(), last.len());
        for (k, v) in &last {
            prop_assert_eq!(t.get(k), Some(v));
        }
    }

    #[test]
    fn prop_growth_lands_on_heuristic_primes(n in 0usize..2_000, start in 1usize..50) {
        let mut t: ChainedHashTable<usize, ()> = ChainedHashTable::new(start).unwrap();
        let mut current = t.bucket_count();
        for k in 0..n {
            t.put(k, ()).unwrap();
            if t.bucket_count() != current {
                current = t.bucket_count();
                prop_assert_eq!(current, ideal_bucket_count(t.len(), 3.0));
                prop_assert!(current >= 5 && current % 2 == 1 && is_probable_prime(current));
            }
        }
        // After the last growth the ratio is back within the upper threshold.
        prop_assert!(t.len() as f64 / t.bucket_count() as f64 <= 15.0);
    }

    #[test]
    fn prop_cursor_matches_iter(keys in proptest::collection::vec(any::<u32>(), 0..300), buckets in 1usize..40) {
        let mut t: ChainedHashTable<u32, u32> = ChainedHashTable::new(buckets).unwrap();
        for k in &keys {
            t.put(*k, k.wrapping_mul(3)).unwrap();
        }
        let mut walked = Vec::new();
        let mut step = t.first();
        while let Some((cursor, k, v)) = step {
            walked.push((*k, *v));
            step = t.next(cursor).unwrap();
        }
        let iterated: Vec<(u32, u32)> = t.iter().map(|(k, v)| (*k, *v)).collect();
        prop_assert_eq!(walked.len(), t.len());
        prop_assert_eq!(walked, iterated);
    }

    #[test]
    fn prop_capability_matches_concrete(ops in proptest::collection::vec((0u8..4, 0u32..64), 1..200)) {
        let mut concrete: ChainedHashTable<u32, u32> = ChainedHashTable::new(5).unwrap();
        let mut object = ContainerFactory.hash_table::<u32, u32>(5).unwrap();
        for (op, k) in ops {
            match op {
                0 => {
                    concrete.put(k, k + 1).unwrap();
                    object.put(k, k + 1).unwrap();
                }
                1 => {
                    prop_assert_eq!(concrete.remove(&k), object.remove(&k));
                }
                2 => {
                    concrete.rehash(k as usize);
                    object.rehash(k as usize);
                }
                _ => {
                    concrete.remove_all();
                    object.clear();
                }
            }
            prop_assert_eq!(concrete.len(), object.size());
            prop_assert_eq!(concrete.bucket_count(), object.bucket_count());
            prop_assert_eq!(concrete.get(&k), object.get(&k));
            prop_assert_eq!(concrete.contains_value(&(k + 1)), object.contains_value(&(k + 1)));
        }
    }
}
