//! Shared test utilities for integration tests.
//!
//! Import from integration test files as:
//! ```ignore
//! mod common;
//! ```

use navtree_core::{
    navigation::{NavigationIndex, NodeStore},
    properties::{NavKey, NO_PARENT_ID},
    rebuild::NavigationRecord,
};
use std::collections::BTreeSet;

/// Records for a small site, parents always listed before their children:
///
/// ```text
/// 1 home
/// ├── 2 about   (sort 1)
/// └── 3 blog    (sort 0)
///     ├── 4 post-a (sort 2)
///     └── 5 post-b (sort 1)
/// ```
///
/// Returns the records and their keys in legacy id order.
#[allow(dead_code)]
pub fn site_records() -> (Vec<NavigationRecord>, [NavKey; 5]) {
    let keys = [(); 5].map(|_| NavKey::new());
    let [home, about, blog, post_a, post_b] = keys;
    let records = vec![
        NavigationRecord::new(1, home, NO_PARENT_ID, 0),
        NavigationRecord::new(2, about, 1, 1),
        NavigationRecord::new(3, blog, 1, 0),
        NavigationRecord::new(4, post_a, 3, 2),
        NavigationRecord::new(5, post_b, 3, 1),
    ];
    (records, keys)
}

/// Assert the properties that must hold after any sequence of operations: forest exclusivity,
/// and parent walks that end at a listed root within forest-size hops.
#[allow(dead_code)]
pub fn assert_consistent(index: &NavigationIndex) {
    let live: BTreeSet<NavKey> = index.live().keys().into_iter().collect();
    let bin: BTreeSet<NavKey> = index.bin().keys().into_iter().collect();
    assert!(
        live.is_disjoint(&bin),
        "keys present in both forests: {:?}",
        live.intersection(&bin).collect::<Vec<_>>()
    );

    for forest in [index.live(), index.bin()] {
        let limit = forest.len();
        for key in forest.keys() {
            let mut hops = 0;
            let mut current = forest.get(&key).expect("key listed by the forest");
            while let Some(parent) = current.parent {
                hops += 1;
                assert!(hops <= limit, "parent walk from {key} does not terminate");
                current = forest
                    .get(&parent)
                    .unwrap_or_else(|| panic!("{key} has an ancestor {parent} outside its forest"));
            }
            assert!(forest.is_root(&current.key), "{key} does not reach a listed root");
        }
    }
    let errors = index.built_in_test();
    assert!(errors.is_empty(), "{errors:?}");
}
