//! In-process stand-in for the durable store: serves records and hands out named read locks.
//!
//! Clones share state, so a caller can keep a handle while a
//! [crate::rebuild::NavigationService] owns another.

use parking_lot::{ArcRwLockReadGuard, ArcRwLockWriteGuard, RawRwLock, RwLock};
use std::{collections::BTreeMap, sync::Arc};

use crate::{
    error::NavError,
    properties::{LockId, TreeKind, Uuid},
    rebuild::{NavigationRecord, NavigationSource, ScopeProvider},
};

type RecordTable = BTreeMap<(Uuid, bool), Vec<NavigationRecord>>;

#[derive(Debug, Clone)]
pub struct InMemoryStore {
    records: Arc<RwLock<RecordTable>>,
    locks: Arc<BTreeMap<LockId, Arc<RwLock<()>>>>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        let locks = [TreeKind::Content, TreeKind::Media]
            .into_iter()
            .map(|tree| (tree.lock_id(), Arc::new(RwLock::new(()))))
            .collect();
        InMemoryStore {
            records: Arc::new(RwLock::new(BTreeMap::new())),
            locks: Arc::new(locks),
        }
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        InMemoryStore::default()
    }

    /// Replace every record of `object_type` with the given trashed flag.
    pub fn set_records(&self, object_type: Uuid, trashed: bool, records: Vec<NavigationRecord>) {
        self.records.write().insert((object_type, trashed), records);
    }

    pub fn push_record(&self, object_type: Uuid, trashed: bool, record: NavigationRecord) {
        self.records
            .write()
            .entry((object_type, trashed))
            .or_default()
            .push(record);
    }

    /// Take the named lock exclusively, as a writer to the durable store would.
    pub fn write_lock(&self, lock: LockId) -> Result<ArcRwLockWriteGuard<RawRwLock, ()>, NavError> {
        self.locks
            .get(&lock)
            .map(|l| l.write_arc())
            .ok_or_else(|| NavError::Lock(format!("unknown lock id {lock}")))
    }
}

impl NavigationSource for InMemoryStore {
    async fn fetch_records(
        &self,
        object_type: Uuid,
        trashed: bool,
    ) -> Result<Vec<NavigationRecord>, NavError> {
        Ok(self
            .records
            .read()
            .get(&(object_type, trashed))
            .cloned()
            .unwrap_or_default())
    }
}

impl ScopeProvider for InMemoryStore {
    type ReadGuard = ArcRwLockReadGuard<RawRwLock, ()>;

    async fn read_lock(&self, lock: LockId) -> Result<Self::ReadGuard, NavError> {
        self.locks
            .get(&lock)
            .map(|l| l.read_arc())
            .ok_or_else(|| NavError::Lock(format!("unknown lock id {lock}")))
    }
}
