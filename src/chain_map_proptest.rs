// Property tests for ChainMap kept inside the crate so they can check the
// arena and chain structure directly.

use crate::chain_map::ChainMap;
use proptest::prelude::*;
use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hasher};

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Put(usize, String),
    Remove(usize),
    Get(usize),
    Contains(String),
    ClearIndex(usize),
    Clear,
    Iterate,
}

fn arb_scenario() -> impl Strategy<Value = (usize, Vec<String>, Vec<OpI>)> {
    (1usize..=8, proptest::collection::vec("[a-z]{0,5}", 1..=8)).prop_flat_map(
        |(capacity, pool)| {
            let idxs: Vec<usize> = (0..pool.len()).collect();
            let idx = proptest::sample::select(idxs);
            let contains_pool = proptest::sample::select(pool.clone());
            let op = prop_oneof![
                4 => (idx.clone(), "[a-z]{0,8}").prop_map(|(i, v)| OpI::Put(i, v)),
                2 => idx.clone().prop_map(OpI::Remove),
                2 => idx.clone().prop_map(OpI::Get),
                1 => prop_oneof![contains_pool, "[a-z]{0,5}"].prop_map(OpI::Contains),
                1 => (0..capacity + 2).prop_map(OpI::ClearIndex),
                1 => Just(OpI::Clear),
                1 => Just(OpI::Iterate),
            ];
            proptest::collection::vec(op, 1..60)
                .prop_map(move |ops| (capacity, pool.clone(), ops))
        },
    )
}

fn run_scenario<S: BuildHasher>(
    mut sut: ChainMap<S>,
    pool: &[String],
    ops: Vec<OpI>,
) -> Result<(), TestCaseError> {
    let mut model: HashMap<String, String> = HashMap::new();

    for op in ops {
        match op {
            OpI::Put(i, v) => {
                let k = &pool[i];
                prop_assert!(sut.put(k, &v).is_ok());
                model.insert(k.clone(), v);
            }
            OpI::Remove(i) => {
                let k = &pool[i];
                let removed = sut.remove(k);
                prop_assert_eq!(removed, model.remove(k).is_some());
                prop_assert!(!sut.contains(k));
            }
            OpI::Get(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.get(k), model.get(k).map(String::as_str));
            }
            OpI::Contains(s) => {
                prop_assert_eq!(sut.contains(&s), model.contains_key(&s));
            }
            OpI::ClearIndex(index) => {
                let res = sut.clear_index(index);
                if index < sut.capacity() {
                    let before = model.len();
                    model.retain(|k, _| sut.index(k) != index);
                    prop_assert_eq!(res, Ok(before - model.len()));
                    prop_assert!(sut.bucket(index).is_some_and(|mut c| c.next().is_none()));
                } else {
                    prop_assert!(res.is_err());
                }
            }
            OpI::Clear => {
                sut.clear();
                model.clear();
            }
            OpI::Iterate => {
                let s: BTreeMap<&str, &str> = sut.iter().collect();
                let m: BTreeMap<&str, &str> = model
                    .iter()
                    .map(|(k, v)| (k.as_str(), v.as_str()))
                    .collect();
                prop_assert_eq!(s, m);
            }
        }

        // Post-conditions after each op
        sut.assert_consistent();
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
    }
    Ok(())
}

// Property: State-machine equivalence against std::collections::HashMap.
// Invariants exercised across random operation sequences:
// - `put` inserts or replaces; `len` counts distinct keys.
// - `get`/`contains` agree with the model; `remove` reports presence.
// - `clear_index` drops exactly the keys hashing to that bucket.
// - Chains stay well formed: no unpopulated or misplaced entries.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((capacity, pool, ops) in arb_scenario()) {
        let sut = ChainMap::new(capacity).unwrap();
        run_scenario(sut, &pool, ops)?;
    }
}

// Collision variant using a constant hasher so every key shares one chain.
#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

// Property: Same state-machine invariants as above, under worst-case
// collision behavior. This stresses predecessor tracking on removal and
// tail linking on insertion.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((capacity, pool, ops) in arb_scenario()) {
        let sut = ChainMap::with_hasher(capacity, ConstBuildHasher).unwrap();
        run_scenario(sut, &pool, ops)?;
    }
}
