#![cfg(test)]

// Property tests for StrHashMap kept inside the crate so they can check the
// internal store/table invariants after every operation.

use crate::config::{ArrayConfig, MapConfig};
use crate::error::InsertError;
use crate::hash::KeyHasher;
use crate::str_hash_map::StrHashMap;
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::collections::{BTreeSet, HashMap};

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize, i32),
    GetOrInsert(usize, i32),
    Update(usize, i32),
    Delete(usize),
    Remove(usize),
    Get(usize),
    Contains(String),
    Mutate(usize, i32),
    Keys,
    Clear,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,4}", 1..=24).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            6 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Insert(i, v)),
            2 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::GetOrInsert(i, v)),
            2 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Update(i, v)),
            3 => idx.clone().prop_map(OpI::Delete),
            2 => idx.clone().prop_map(OpI::Remove),
            3 => idx.clone().prop_map(OpI::Get),
            2 => prop_oneof![contains_pool, "[a-z]{0,4}"].prop_map(OpI::Contains),
            2 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::Mutate(i, d)),
            1 => Just(OpI::Keys),
            1 => Just(OpI::Clear),
        ];
        proptest::collection::vec(op, 1..120).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Invariants exercised across random operation sequences:
// - Duplicate keys are rejected; a successful insert reports the value's index.
// - `get`/`contains_key`/`data_index` parity with the model.
// - `delete` reports the vacated index; the next insert reuses a vacated slot,
//   so the value store never grows past the peak live count.
// - `keys` yields each live key exactly once.
// - Store/table consistency and the load bound hold after every op.
fn run_state_machine<S: KeyHasher>(
    mut sut: StrHashMap<i32, S>,
    pool: &[String],
    ops: Vec<OpI>,
) -> Result<(), TestCaseError> {
    let mut model: HashMap<String, i32> = HashMap::new();
    let mut indices: HashMap<String, usize> = HashMap::new();
    let mut vacated: BTreeSet<usize> = BTreeSet::new();
    let mut peak = 0;

    for op in ops {
        match op {
            OpI::Insert(i, v) => {
                let k = &pool[i];
                let already = model.contains_key(k);
                match sut.insert(k, v) {
                    Ok(idx) => {
                        prop_assert!(!already, "insert must fail on duplicate");
                        if !vacated.is_empty() {
                            prop_assert!(vacated.remove(&idx), "index {} was not vacated", idx);
                        }
                        indices.insert(k.clone(), idx);
                        model.insert(k.clone(), v);
                    }
                    Err(InsertError::DuplicateKey) => {
                        prop_assert!(already, "duplicate error only when key exists");
                    }
                }
            }
            OpI::GetOrInsert(i, v) => {
                let k = &pool[i];
                let expected = *model.entry(k.clone()).or_insert(v);
                prop_assert_eq!(*sut.get_or_insert(k, v), expected);
                let idx = sut.data_index(k).expect("present after get_or_insert");
                if indices.insert(k.clone(), idx).is_none() {
                    vacated.remove(&idx);
                }
            }
            OpI::Update(i, v) => {
                let k = &pool[i];
                let present = model.contains_key(k);
                prop_assert_eq!(sut.update(k, v), present);
                if present {
                    model.insert(k.clone(), v);
                }
            }
            OpI::Delete(i) => {
                let k = &pool[i];
                let idx = sut.delete(k);
                prop_assert_eq!(idx, indices.remove(k));
                prop_assert_eq!(idx.is_some(), model.remove(k).is_some());
                if let Some(idx) = idx {
                    prop_assert!(sut.value_at(idx).is_none());
                    vacated.insert(idx);
                }
            }
            OpI::Remove(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.remove(k), model.remove(k));
                if let Some(idx) = indices.remove(k) {
                    vacated.insert(idx);
                }
            }
            OpI::Get(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.get(k), model.get(k));
                prop_assert_eq!(sut.data_index(k), indices.get(k).copied());
            }
            OpI::Contains(s) => {
                prop_assert_eq!(sut.contains_key(&s), model.contains_key(&s));
            }
            OpI::Mutate(i, d) => {
                let k = &pool[i];
                if let Some(v) = sut.get_mut(k) {
                    *v = v.saturating_add(d);
                }
                if let Some(v) = model.get_mut(k) {
                    *v = v.saturating_add(d);
                }
            }
            OpI::Keys => {
                let listed: Vec<&str> = sut.keys().collect();
                let s_keys: BTreeSet<&str> = listed.iter().copied().collect();
                let m_keys: BTreeSet<&str> = model.keys().map(String::as_str).collect();
                prop_assert_eq!(listed.len(), s_keys.len(), "keys must not repeat");
                prop_assert_eq!(s_keys, m_keys);
            }
            OpI::Clear => {
                sut.clear();
                model.clear();
                indices.clear();
                vacated.clear();
                peak = 0;
            }
        }

        peak = peak.max(model.len());
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        prop_assert_eq!(sut.range(), peak);
        sut.assert_invariants();
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        run_state_machine(StrHashMap::new(), &pool, ops)?;
    }

    // A one-bucket initial table and doubling growth make most scenarios
    // rehash several times.
    #[test]
    fn prop_state_machine_with_frequent_growth((pool, ops) in arb_scenario()) {
        let cfg = MapConfig::default()
            .initial_buckets(1)
            .bucket_growth(2)
            .storage(ArrayConfig::default().min_capacity(1));
        run_state_machine(StrHashMap::with_config(cfg).unwrap(), &pool, ops)?;
    }
}

// Collision variant using a constant hasher to stress key comparison.
struct ConstHasher;
impl KeyHasher for ConstHasher {
    fn hash_key(&self, _key: &str) -> u32 {
        7
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        run_state_machine(StrHashMap::with_hasher(ConstHasher), &pool, ops)?;
    }
}
