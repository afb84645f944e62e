//! Bulk (re)population of a forest from flat external records.
//!
//! The durable store and its locking are external collaborators, reached through
//! [NavigationSource] and [ScopeProvider]. [NavigationService] wires them to a
//! [NavigationIndex] and exposes the two rebuild entry points.

use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, future::Future, sync::Arc};

use crate::{
    config::NavigationConfig,
    error::NavError,
    navigation::{NavNode, NavigationIndex, NodeStore},
    properties::{ForestKind, LegacyId, LockId, NavKey, SortOrder, TreeKind, Uuid, NO_PARENT_ID},
};

/// A flat entity record as served by the durable store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationRecord {
    pub legacy_id: LegacyId,
    pub key: NavKey,
    /// [NO_PARENT_ID] when the record has no parent.
    pub parent_legacy_id: LegacyId,
    pub sort_order: SortOrder,
}

impl NavigationRecord {
    pub fn new(
        legacy_id: LegacyId,
        key: NavKey,
        parent_legacy_id: LegacyId,
        sort_order: SortOrder,
    ) -> Self {
        NavigationRecord {
            legacy_id,
            key,
            parent_legacy_id,
            sort_order,
        }
    }
}

/// Outcome of populating a forest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RebuildSummary {
    /// Records inserted as nodes.
    pub nodes: usize,
    /// Records registered as roots.
    pub roots: usize,
    /// Records whose parent could not be resolved. They are present but parent-less.
    pub orphans: usize,
    /// Records left out because their key is a member of the other forest.
    pub skipped: usize,
}

/// Insert one node per record into `forest`, linking each to its parent.
///
/// Parent ids are translated to keys through a legacy id → key map built from the full record
/// set. A record whose parent id is [NO_PARENT_ID] or one of `root_parent_ids` becomes a root.
/// A record whose parent id is unknown, or whose parent has not been inserted yet because it
/// comes later in `records`, is left parent-less and is not registered as a root. That is not
/// an error.
pub fn build_forest<S: NodeStore>(
    forest: &S,
    records: &[NavigationRecord],
    root_parent_ids: &[LegacyId],
) -> RebuildSummary {
    let id_to_key: BTreeMap<LegacyId, NavKey> = records
        .iter()
        .map(|record| (record.legacy_id, record.key))
        .collect();

    let mut summary = RebuildSummary::default();
    for record in records {
        forest.put(NavNode::new(record.key, record.sort_order));
        summary.nodes += 1;

        if record.parent_legacy_id == NO_PARENT_ID
            || root_parent_ids.contains(&record.parent_legacy_id)
        {
            forest.add_root(record.key);
            summary.roots += 1;
            continue;
        }

        let linked = id_to_key
            .get(&record.parent_legacy_id)
            .filter(|parent_key| **parent_key != record.key)
            .is_some_and(|parent_key| {
                forest.update(parent_key, |parent| {
                    parent.insert_child(record.key);
                }) && forest.update(&record.key, |node| node.parent = Some(*parent_key))
            });
        if !linked {
            tracing::debug!(
                "[build_forest] parent {} of {} is unresolved; leaving it parent-less",
                record.parent_legacy_id,
                record.key
            );
            summary.orphans += 1;
        }
    }
    summary
}

/// Read access to the durable store holding the canonical hierarchy.
pub trait NavigationSource: Sync {
    /// All records of `object_type`, either trashed or not trashed.
    fn fetch_records(
        &self,
        object_type: Uuid,
        trashed: bool,
    ) -> impl Future<Output = Result<Vec<NavigationRecord>, NavError>> + Send;
}

/// Scoped acquisition of named read locks on the durable store.
pub trait ScopeProvider: Sync {
    /// Released when dropped.
    type ReadGuard: Send;

    fn read_lock(
        &self,
        lock: LockId,
    ) -> impl Future<Output = Result<Self::ReadGuard, NavError>> + Send;
}

/// A [NavigationIndex] kept in step with a durable store.
///
/// The service decides nothing about *when* to rebuild; callers invoke
/// [NavigationService::rebuild_live] and [NavigationService::rebuild_bin].
#[derive(Debug)]
pub struct NavigationService<B> {
    index: Arc<NavigationIndex>,
    backend: B,
    config: NavigationConfig,
    rebuild_gate: tokio::sync::Mutex<()>,
}

impl<B> NavigationService<B>
where
    B: NavigationSource + ScopeProvider,
{
    pub fn new(backend: B, config: NavigationConfig) -> Self {
        NavigationService::with_index(Arc::new(NavigationIndex::new()), backend, config)
    }

    pub fn with_index(index: Arc<NavigationIndex>, backend: B, config: NavigationConfig) -> Self {
        NavigationService {
            index,
            backend,
            config,
            rebuild_gate: tokio::sync::Mutex::new(()),
        }
    }

    pub fn index(&self) -> &Arc<NavigationIndex> {
        &self.index
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn config(&self) -> &NavigationConfig {
        &self.config
    }

    /// Repopulate the live forest from the store's non-trashed records.
    ///
    /// Returns `Ok(None)` without touching anything when the configured lock id is not one of
    /// the known tree locks.
    #[tracing::instrument(skip(self))]
    pub async fn rebuild_live(&self) -> Result<Option<RebuildSummary>, NavError> {
        self.handle_rebuild(ForestKind::Live).await
    }

    /// Repopulate the bin forest from the store's trashed records.
    ///
    /// Returns `Ok(None)` without touching anything when the configured lock id is not one of
    /// the known tree locks.
    #[tracing::instrument(skip(self))]
    pub async fn rebuild_bin(&self) -> Result<Option<RebuildSummary>, NavError> {
        self.handle_rebuild(ForestKind::Bin).await
    }

    async fn handle_rebuild(&self, kind: ForestKind) -> Result<Option<RebuildSummary>, NavError> {
        let Some(tree) = TreeKind::from_lock(self.config.lock_id) else {
            tracing::warn!(
                "[handle_rebuild] lock id {} guards no known tree; skipping {kind} rebuild",
                self.config.lock_id
            );
            return Ok(None);
        };

        let _rebuilding = self.rebuild_gate.lock().await;
        let _scope = self.backend.read_lock(tree.lock_id()).await?;
        let trashed = kind == ForestKind::Bin;
        let records = self
            .backend
            .fetch_records(self.config.object_type, trashed)
            .await?;

        let root_parent_ids: Vec<LegacyId> = match kind {
            ForestKind::Live => Vec::new(),
            ForestKind::Bin => vec![tree.recycle_bin_id()],
        };
        let summary = self.index.populate(
            kind,
            &records,
            &root_parent_ids,
            self.config.clear_before_rebuild,
        );
        if summary.orphans > 0 {
            tracing::warn!(
                "[handle_rebuild] {tree} {kind} rebuild left {} orphaned node(s)",
                summary.orphans
            );
        }
        tracing::debug!("[handle_rebuild] {tree} {kind} rebuild: {summary:?}");
        Ok(Some(summary))
    }
}
