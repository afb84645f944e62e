//! NavigationIndex: the live and bin forests plus the structural mutations between them.

use parking_lot::Mutex;
use std::{collections::BTreeSet, fmt};

use super::{query, Forest, NavNode, NodeStore};
use crate::{
    error::NavError,
    event::NavigationEvent,
    properties::{ForestKind, LegacyId, NavKey, SortOrder},
    rebuild::{build_forest, NavigationRecord, RebuildSummary},
};

/// How a subtree relocation treats the sort order of each relocated node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resort {
    /// Assign the target forest's size at the moment of insertion.
    Arrival,
    /// Carry the node's sort order over unchanged.
    Keep,
}

/// In-memory mirror of a navigation hierarchy in two parallel forests: `live` and `bin`.
///
/// Invariants, holding after every completed operation:
///
/// 0. A key is a member of at most one forest.
///
/// 1. A node's parent, if any, is a member of the same forest, and lists the node among its
///    children.
///
/// 2. Every node reaches a member of its forest's roots list by following parent links, without
///    revisiting a key.
///
/// Sibling order is never stored. It is derived on every read from ascending sort order, ties
/// keeping insertion order.
///
/// Single-key reads and writes on either forest are atomic. Compound mutations take the index
/// write gate, so writers are serialized, but readers may observe the intermediate states of a
/// mutation in progress: a node detached but not yet re-attached, or a subtree partially
/// relocated between forests. [NavigationIndex::built_in_test] reports invariant violations.
#[derive(Debug, Default)]
pub struct NavigationIndex {
    live: Forest,
    bin: Forest,
    write_gate: Mutex<()>,
}

impl fmt::Display for NavigationIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NavigationIndex(live: {}, bin: {})", self.live, self.bin)
    }
}

impl NavigationIndex {
    pub fn new() -> NavigationIndex {
        NavigationIndex::default()
    }

    pub fn live(&self) -> &Forest {
        &self.live
    }

    pub fn bin(&self) -> &Forest {
        &self.bin
    }

    pub fn forest(&self, kind: ForestKind) -> &Forest {
        match kind {
            ForestKind::Live => &self.live,
            ForestKind::Bin => &self.bin,
        }
    }

    // ---------------------------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------------------------

    pub fn node(&self, key: &NavKey) -> Option<NavNode> {
        self.live.get(key)
    }

    pub fn node_in_bin(&self, key: &NavKey) -> Option<NavNode> {
        self.bin.get(key)
    }

    pub fn contains(&self, key: &NavKey) -> bool {
        self.live.contains(key)
    }

    pub fn is_in_bin(&self, key: &NavKey) -> bool {
        self.bin.contains(key)
    }

    pub fn sort_order_of(&self, key: &NavKey) -> Option<SortOrder> {
        self.live.sort_order(key)
    }

    pub fn parent_of(&self, key: &NavKey) -> Result<Option<NavKey>, NavError> {
        query::parent_of(&self.live, key)
    }

    pub fn roots(&self) -> Vec<NavKey> {
        query::roots_of(&self.live)
    }

    pub fn children_of(&self, key: &NavKey) -> Result<Vec<NavKey>, NavError> {
        query::children_of(&self.live, key)
    }

    pub fn descendants_of(&self, key: &NavKey) -> Result<Vec<NavKey>, NavError> {
        query::descendants_of(&self.live, key)
    }

    pub fn ancestors_of(&self, key: &NavKey) -> Result<Vec<NavKey>, NavError> {
        query::ancestors_of(&self.live, key)
    }

    pub fn siblings_of(&self, key: &NavKey) -> Result<Vec<NavKey>, NavError> {
        query::siblings_of(&self.live, key)
    }

    /// Depth of a live node. See [query::level_of].
    pub fn level_of(&self, key: &NavKey) -> Option<usize> {
        query::level_of(&self.live, key)
    }

    pub fn parent_of_in_bin(&self, key: &NavKey) -> Result<Option<NavKey>, NavError> {
        query::parent_of(&self.bin, key)
    }

    pub fn roots_in_bin(&self) -> Vec<NavKey> {
        query::roots_of(&self.bin)
    }

    pub fn children_of_in_bin(&self, key: &NavKey) -> Result<Vec<NavKey>, NavError> {
        query::children_of(&self.bin, key)
    }

    pub fn descendants_of_in_bin(&self, key: &NavKey) -> Result<Vec<NavKey>, NavError> {
        query::descendants_of(&self.bin, key)
    }

    pub fn ancestors_of_in_bin(&self, key: &NavKey) -> Result<Vec<NavKey>, NavError> {
        query::ancestors_of(&self.bin, key)
    }

    pub fn siblings_of_in_bin(&self, key: &NavKey) -> Result<Vec<NavKey>, NavError> {
        query::siblings_of(&self.bin, key)
    }

    // ---------------------------------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------------------------------

    /// Create a live node under `parent`, or as a live root if `parent` is `None`. The sort
    /// order defaults to zero.
    #[tracing::instrument(skip(self))]
    pub fn add(
        &self,
        key: NavKey,
        parent: Option<NavKey>,
        sort_order: Option<SortOrder>,
    ) -> Result<(), NavError> {
        let _gate = self.write_gate.lock();
        if let Some(parent_key) = parent {
            if !self.live.contains(&parent_key) {
                return Err(NavError::ParentNotFound(parent_key));
            }
        }
        if self.live.contains(&key) || self.bin.contains(&key) {
            return Err(NavError::AlreadyExists(key));
        }

        let mut node = NavNode::new(key, sort_order.unwrap_or_default());
        node.parent = parent;
        if !self.live.try_put(node) {
            return Err(NavError::AlreadyExists(key));
        }
        link(&self.live, key, parent);
        tracing::debug!("[add] {key} under {parent:?}");
        Ok(())
    }

    /// Re-parent a live node under `target`, or make it a live root if `target` is `None`. The
    /// node's sort order is left untouched.
    #[tracing::instrument(skip(self))]
    pub fn move_to(&self, key: NavKey, target: Option<NavKey>) -> Result<(), NavError> {
        let _gate = self.write_gate.lock();
        let node = self.live.get(&key).ok_or(NavError::NotFound(key))?;
        if let Some(target_key) = target {
            if target_key == key {
                return Err(NavError::InvalidOperation(format!(
                    "{key} cannot become its own parent"
                )));
            }
            if !self.live.contains(&target_key) {
                return Err(NavError::ParentNotFound(target_key));
            }
            if query::ancestors_of(&self.live, &target_key)?.contains(&key) {
                return Err(NavError::InvalidOperation(format!(
                    "{key} cannot move beneath its own descendant {target_key}"
                )));
            }
        }

        unlink(&self.live, key, node.parent);
        self.live.update(&key, |n| n.parent = target);
        link(&self.live, key, target);
        tracing::debug!("[move_to] {key}: {:?} -> {target:?}", node.parent);
        Ok(())
    }

    /// Overwrite a live node's sort order. Sibling order follows on the next read.
    #[tracing::instrument(skip(self))]
    pub fn update_sort_order(&self, key: NavKey, sort_order: SortOrder) -> Result<(), NavError> {
        let _gate = self.write_gate.lock();
        if self.live.update(&key, |n| n.sort_order = sort_order) {
            Ok(())
        } else {
            Err(NavError::NotFound(key))
        }
    }

    /// Move a live node and its whole live subtree into the bin. The node becomes a bin root.
    ///
    /// Every relocated node is assigned the bin's size at the moment of its insertion as its
    /// sort order, so bin siblings are ordered by arrival.
    #[tracing::instrument(skip(self))]
    pub fn move_to_bin(&self, key: NavKey) -> Result<(), NavError> {
        let _gate = self.write_gate.lock();
        let node = self.live.get(&key).ok_or(NavError::NotFound(key))?;
        if self.bin.contains(&key) {
            return Err(NavError::AlreadyExists(key));
        }

        unlink(&self.live, key, node.parent);
        self.live.update(&key, |n| n.parent = None);
        let moved = relocate_subtree(&self.live, &self.bin, key, Resort::Arrival);
        tracing::debug!("[move_to_bin] {key}: {moved} node(s) moved to the bin");
        Ok(())
    }

    /// Move a bin node and its whole bin subtree back into the live forest, under `target` or
    /// as a live root if `target` is `None`. Sort orders travel unchanged.
    #[tracing::instrument(skip(self))]
    pub fn restore_from_bin(&self, key: NavKey, target: Option<NavKey>) -> Result<(), NavError> {
        let _gate = self.write_gate.lock();
        let node = self.bin.get(&key).ok_or(NavError::NotFound(key))?;
        if let Some(target_key) = target {
            if !self.live.contains(&target_key) {
                return Err(NavError::ParentNotFound(target_key));
            }
        }
        if self.live.contains(&key) {
            return Err(NavError::AlreadyExists(key));
        }

        unlink(&self.bin, key, node.parent);
        // The parent pointer travels with the node.
        self.bin.update(&key, |n| n.parent = target);
        let moved = relocate_subtree(&self.bin, &self.live, key, Resort::Keep);
        tracing::debug!("[restore_from_bin] {key}: {moved} node(s) restored under {target:?}");
        Ok(())
    }

    /// Permanently destroy a bin node and its whole bin subtree.
    #[tracing::instrument(skip(self))]
    pub fn remove_from_bin(&self, key: NavKey) -> Result<(), NavError> {
        let _gate = self.write_gate.lock();
        let node = self.bin.get(&key).ok_or(NavError::NotFound(key))?;

        unlink(&self.bin, key, node.parent);
        let descendants = query::descendants_of(&self.bin, &key)?;
        for descendant in descendants.iter() {
            self.bin.remove(descendant);
        }
        self.bin.remove(&key);
        tracing::debug!(
            "[remove_from_bin] {key}: destroyed with {} descendant(s)",
            descendants.len()
        );
        Ok(())
    }

    /// Apply an inbound change event through the matching mutation.
    pub fn process_event(&self, event: &NavigationEvent) -> Result<(), NavError> {
        match event {
            NavigationEvent::NodeAdded(key, parent, sort_order) => {
                self.add(*key, *parent, *sort_order)
            }
            NavigationEvent::NodeMoved(key, target) => self.move_to(*key, *target),
            NavigationEvent::SortOrderChanged(key, sort_order) => {
                self.update_sort_order(*key, *sort_order)
            }
            NavigationEvent::MovedToBin(key) => self.move_to_bin(*key),
            NavigationEvent::RestoredFromBin(key, target) => self.restore_from_bin(*key, *target),
            NavigationEvent::RemovedFromBin(key) => self.remove_from_bin(*key),
        }
    }

    /// Populate one forest from external records. See [build_forest].
    ///
    /// With `clear` set the forest is emptied first; otherwise the records are merged over the
    /// current content.
    ///
    /// Records whose key is a member of the other forest are skipped and counted in
    /// [RebuildSummary::skipped]. Their children then have no resolvable parent and are left
    /// orphaned.
    #[tracing::instrument(skip(self, records))]
    pub fn populate(
        &self,
        kind: ForestKind,
        records: &[NavigationRecord],
        root_parent_ids: &[LegacyId],
        clear: bool,
    ) -> RebuildSummary {
        let _gate = self.write_gate.lock();
        let (forest, other) = match kind {
            ForestKind::Live => (&self.live, &self.bin),
            ForestKind::Bin => (&self.bin, &self.live),
        };
        if clear {
            forest.clear();
        }

        let (accepted, skipped): (Vec<NavigationRecord>, Vec<NavigationRecord>) = records
            .iter()
            .cloned()
            .partition(|record| !other.contains(&record.key));
        for record in skipped.iter() {
            tracing::warn!(
                "[populate] {} is in the other forest; skipping it in the {kind} rebuild",
                record.key
            );
        }

        let mut summary = build_forest(forest, &accepted, root_parent_ids);
        summary.skipped = skipped.len();
        summary
    }

    /// Check the forest invariants. Returns one message per violation; empty means consistent.
    pub fn built_in_test(&self) -> Vec<String> {
        let mut errors = Vec::new();
        for (kind, forest, other) in [
            (ForestKind::Live, &self.live, &self.bin),
            (ForestKind::Bin, &self.bin, &self.live),
        ] {
            check_forest(kind, forest, other, &mut errors);
        }
        errors
    }
}

/// Register `key` as a child of `parent`, or as a root when `parent` is `None`.
fn link(forest: &Forest, key: NavKey, parent: Option<NavKey>) {
    match parent {
        Some(parent_key) => {
            forest.update(&parent_key, |p| {
                p.insert_child(key);
            });
        }
        None => forest.add_root(key),
    }
}

/// Drop `key` from `parent`'s child set, or from the roots list when `parent` is `None`.
fn unlink(forest: &Forest, key: NavKey, parent: Option<NavKey>) {
    match parent {
        Some(parent_key) => {
            forest.update(&parent_key, |p| {
                p.remove_child(&key);
            });
        }
        None => {
            forest.remove_root(&key);
        }
    }
}

/// Move the subtree rooted at `key` from one forest to the other, node by node.
///
/// The top node must already carry its parent pointer for the target forest. Children are
/// relocated depth first in ascending sort order, each child's subtree completing before the
/// next sibling starts. A node leaves `from` only after its insertion into `to` succeeded; a
/// node whose key is already taken in `to` stays behind together with its subtree.
///
/// Returns the number of relocated nodes.
fn relocate_subtree(from: &Forest, to: &Forest, key: NavKey, resort: Resort) -> usize {
    let mut moved = 0;
    let mut stack = vec![key];
    while let Some(current) = stack.pop() {
        let Some(mut node) = from.get(&current) else {
            continue;
        };
        let children = query::ordered(from, node.children.iter().copied());
        node.children = children.clone();
        if resort == Resort::Arrival {
            node.sort_order = SortOrder::try_from(to.len()).unwrap_or(SortOrder::MAX);
        }
        let parent = node.parent;
        if !to.try_put(node) {
            tracing::warn!("[relocate_subtree] {current} already present in target forest");
            continue;
        }
        from.remove(&current);
        if current == key {
            link(to, key, parent);
        }
        moved += 1;
        stack.extend(children.into_iter().rev());
    }
    moved
}

fn check_forest(kind: ForestKind, forest: &Forest, other: &Forest, errors: &mut Vec<String>) {
    let roots: BTreeSet<NavKey> = forest.roots().into_iter().collect();
    for root in roots.iter() {
        match forest.get(root) {
            None => errors.push(format!(
                "[NavigationIndex::built_in_test] {kind} root {root} has no node"
            )),
            Some(node) if node.parent.is_some() => errors.push(format!(
                "[NavigationIndex::built_in_test] {kind} root {root} has parent {:?}",
                node.parent
            )),
            _ => {}
        }
    }

    let limit = forest.len();
    for node in forest.nodes() {
        let key = node.key;
        if other.contains(&key) {
            errors.push(format!(
                "[NavigationIndex::built_in_test] {key} is a member of both forests"
            ));
        }
        if let Some(parent_key) = node.parent {
            match forest.get(&parent_key) {
                None => errors.push(format!(
                    "[NavigationIndex::built_in_test] {kind} node {key} has dangling parent \
                     {parent_key}"
                )),
                Some(parent) if !parent.children.contains(&key) => errors.push(format!(
                    "[NavigationIndex::built_in_test] {kind} parent {parent_key} does not list \
                     child {key}"
                )),
                _ => {}
            }
        }

        let mut visited = BTreeSet::from([key]);
        let mut current = node;
        let mut reached_root = false;
        while visited.len() <= limit {
            match current.parent {
                None => {
                    reached_root = roots.contains(&current.key);
                    break;
                }
                Some(parent_key) => {
                    if !visited.insert(parent_key) {
                        errors.push(format!(
                            "[NavigationIndex::built_in_test] {kind} node {key} is part of a \
                             parent cycle"
                        ));
                        break;
                    }
                    match forest.get(&parent_key) {
                        Some(parent) => current = parent,
                        None => break,
                    }
                }
            }
        }
        if !reached_root {
            errors.push(format!(
                "[NavigationIndex::built_in_test] {kind} node {key} is unreachable from the \
                 roots list"
            ));
        }
    }
}
