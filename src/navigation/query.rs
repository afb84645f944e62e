//! Read-only traversals over a single forest.
//!
//! Every function takes a [NodeStore] and fails with [NavError::NotFound] when the input key is
//! absent. Dangling references discovered on the way are never reported: stale child keys are
//! filtered out, and the ancestor walk stops at the first parent it cannot resolve.

use super::NodeStore;
use crate::{
    error::NavError,
    properties::{NavKey, SortOrder},
};

/// Order `keys` by ascending sort order, dropping any key absent from `forest`.
///
/// The sort is stable, so keys with equal sort orders keep their relative input order.
pub fn ordered<S: NodeStore, I: IntoIterator<Item = NavKey>>(forest: &S, keys: I) -> Vec<NavKey> {
    let mut weighted: Vec<(SortOrder, NavKey)> = keys
        .into_iter()
        .filter_map(|key| forest.sort_order(&key).map(|sort| (sort, key)))
        .collect();
    weighted.sort_by_key(|(sort, _)| *sort);
    weighted.into_iter().map(|(_, key)| key).collect()
}

/// The parent of `key`, `None` if `key` is a root.
pub fn parent_of<S: NodeStore>(forest: &S, key: &NavKey) -> Result<Option<NavKey>, NavError> {
    forest
        .get(key)
        .map(|node| node.parent)
        .ok_or(NavError::NotFound(*key))
}

/// All roots, ordered by ascending sort order.
pub fn roots_of<S: NodeStore>(forest: &S) -> Vec<NavKey> {
    ordered(forest, forest.roots())
}

/// The live children of `key`, ordered by ascending sort order.
pub fn children_of<S: NodeStore>(forest: &S, key: &NavKey) -> Result<Vec<NavKey>, NavError> {
    let node = forest.get(key).ok_or(NavError::NotFound(*key))?;
    Ok(ordered(forest, node.children))
}

/// The whole subtree below `key`.
///
/// At each node all of its ordered children are emitted before descending into any of them;
/// the descent then visits those children in the same order. Computed eagerly on every call.
pub fn descendants_of<S: NodeStore>(forest: &S, key: &NavKey) -> Result<Vec<NavKey>, NavError> {
    let children = children_of(forest, key)?;
    let mut descendants = children.clone();
    let mut stack: Vec<NavKey> = children.into_iter().rev().collect();
    while let Some(current) = stack.pop() {
        let Ok(children) = children_of(forest, &current) else {
            continue;
        };
        descendants.extend(children.iter().copied());
        stack.extend(children.into_iter().rev());
    }
    Ok(descendants)
}

/// Parent links from `key` upward, nearest ancestor first, up to and including the topmost
/// node reached.
///
/// The walk stops without error at a node whose parent is absent from `forest`. It also stops
/// after `forest.len()` hops, which only happens if the parent links form a cycle.
pub fn ancestors_of<S: NodeStore>(forest: &S, key: &NavKey) -> Result<Vec<NavKey>, NavError> {
    let mut node = forest.get(key).ok_or(NavError::NotFound(*key))?;
    let mut ancestors = Vec::new();
    let limit = forest.len();
    while let Some(parent_key) = node.parent {
        if ancestors.len() >= limit {
            break;
        }
        let Some(parent) = forest.get(&parent_key) else {
            break;
        };
        ancestors.push(parent_key);
        node = parent;
    }
    Ok(ancestors)
}

/// The other members of `key`'s sibling group, ordered by ascending sort order.
///
/// For a root that is every other root; otherwise the parent's children without `key`.
pub fn siblings_of<S: NodeStore>(forest: &S, key: &NavKey) -> Result<Vec<NavKey>, NavError> {
    let siblings = match parent_of(forest, key)? {
        None => roots_of(forest),
        Some(parent) => children_of(forest, &parent)?,
    };
    Ok(siblings.into_iter().filter(|k| k != key).collect())
}

/// Depth of `key`: 1 for a root, plus one per ancestor hop.
///
/// `None` if `key` is absent or any hop cannot resolve its parent, which signals a broken chain
/// rather than a depth.
pub fn level_of<S: NodeStore>(forest: &S, key: &NavKey) -> Option<usize> {
    let mut level = 1;
    let mut parent = parent_of(forest, key).ok()?;
    let limit = forest.len();
    while let Some(parent_key) = parent {
        if level > limit {
            return None;
        }
        parent = parent_of(forest, &parent_key).ok()?;
        level += 1;
    }
    Some(level)
}
