//! Key → node storage plus a roots list.
//!
//! No validation happens here. The mutation engine and the rebuild pipeline are the only
//! writers and are responsible for the forest invariants.

use parking_lot::RwLock;
use std::{collections::BTreeMap, fmt};

use super::NavNode;
use crate::properties::{NavKey, SortOrder};

/// Storage seam shared by the live and bin forests.
///
/// Every method is atomic with respect to a single key. Nothing composes across calls: a
/// sequence of calls may interleave with calls from other threads.
pub trait NodeStore: Send + Sync {
    /// Snapshot of the node stored under `key`.
    fn get(&self, key: &NavKey) -> Option<NavNode>;

    fn contains(&self, key: &NavKey) -> bool;

    /// Store `node` under its own key, returning the node it replaced.
    fn put(&self, node: NavNode) -> Option<NavNode>;

    /// Store `node` only if its key is vacant. Returns false if the key was taken.
    fn try_put(&self, node: NavNode) -> bool;

    fn remove(&self, key: &NavKey) -> Option<NavNode>;

    /// Mutate the node under `key` in place. Returns false if the key is absent.
    fn update<F: FnOnce(&mut NavNode)>(&self, key: &NavKey, f: F) -> bool;

    fn sort_order(&self, key: &NavKey) -> Option<SortOrder> {
        self.get(key).map(|node| node.sort_order)
    }

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn keys(&self) -> Vec<NavKey>;

    /// Root keys in insertion order. Sibling order is derived by the query engine.
    fn roots(&self) -> Vec<NavKey>;

    /// Append `key` to the roots list unless it is already present.
    fn add_root(&self, key: NavKey);

    /// Returns false if `key` was not a root.
    fn remove_root(&self, key: &NavKey) -> bool;

    fn is_root(&self, key: &NavKey) -> bool {
        self.roots().contains(key)
    }

    /// Drop every node and root.
    fn clear(&self);
}

/// Thread-safe [NodeStore] backed by a lock-guarded ordered map.
#[derive(Debug, Default)]
pub struct Forest {
    nodes: RwLock<BTreeMap<NavKey, NavNode>>,
    roots: RwLock<Vec<NavKey>>,
}

impl Forest {
    pub fn new() -> Forest {
        Forest::default()
    }

    /// Snapshot every node, ordered by key.
    pub fn nodes(&self) -> Vec<NavNode> {
        self.nodes.read().values().cloned().collect()
    }
}

impl NodeStore for Forest {
    fn get(&self, key: &NavKey) -> Option<NavNode> {
        self.nodes.read().get(key).cloned()
    }

    fn contains(&self, key: &NavKey) -> bool {
        self.nodes.read().contains_key(key)
    }

    fn put(&self, node: NavNode) -> Option<NavNode> {
        self.nodes.write().insert(node.key, node)
    }

    fn try_put(&self, node: NavNode) -> bool {
        let mut nodes = self.nodes.write();
        if nodes.contains_key(&node.key) {
            return false;
        }
        nodes.insert(node.key, node);
        true
    }

    fn remove(&self, key: &NavKey) -> Option<NavNode> {
        self.nodes.write().remove(key)
    }

    fn update<F: FnOnce(&mut NavNode)>(&self, key: &NavKey, f: F) -> bool {
        match self.nodes.write().get_mut(key) {
            Some(node) => {
                f(node);
                true
            }
            None => false,
        }
    }

    fn sort_order(&self, key: &NavKey) -> Option<SortOrder> {
        self.nodes.read().get(key).map(|node| node.sort_order)
    }

    fn len(&self) -> usize {
        self.nodes.read().len()
    }

    fn keys(&self) -> Vec<NavKey> {
        self.nodes.read().keys().copied().collect()
    }

    fn roots(&self) -> Vec<NavKey> {
        self.roots.read().clone()
    }

    fn add_root(&self, key: NavKey) {
        let mut roots = self.roots.write();
        if !roots.contains(&key) {
            roots.push(key);
        }
    }

    fn remove_root(&self, key: &NavKey) -> bool {
        let mut roots = self.roots.write();
        let before = roots.len();
        roots.retain(|k| k != key);
        before != roots.len()
    }

    fn is_root(&self, key: &NavKey) -> bool {
        self.roots.read().contains(key)
    }

    fn clear(&self) {
        // Roots first so a concurrent reader never sees a root without its node.
        self.roots.write().clear();
        self.nodes.write().clear();
    }
}

impl fmt::Display for Forest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Forest({} nodes, {} roots)",
            self.len(),
            self.roots.read().len()
        )
    }
}
