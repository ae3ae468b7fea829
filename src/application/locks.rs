//! Resource Locks
//!
//! In-process mutual exclusion per stored resource. Attach, detach and delete
//! hold the locks of every record they read-check-write, so two requests in
//! this process cannot both pass an attachment check before either writes.
//! Processes sharing one database are not excluded from each other.
//!
//! An entry lives only while some request holds or waits on it; the last
//! guard to release a key removes it from the registry.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex as SyncMutex, PoisonError};

use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::models::{ItemKey, ProjectId, ResourceKind};

type LockTable = SyncMutex<HashMap<LockKey, Arc<Mutex<()>>>>;

/// Identity of one lockable resource
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LockKey {
    project_id: ProjectId,
    kind: ResourceKind,
    key: ItemKey,
}

impl LockKey {
    #[must_use]
    pub fn new(project_id: &ProjectId, kind: ResourceKind, key: ItemKey) -> Self {
        Self {
            project_id: project_id.clone(),
            kind,
            key,
        }
    }
}

/// Held locks; released on drop
pub struct ResourceLockGuard {
    held: Vec<(LockKey, OwnedMutexGuard<()>)>,
    table: Arc<LockTable>,
}

impl fmt::Debug for ResourceLockGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceLockGuard")
            .field("keys", &self.held.iter().map(|(key, _)| key).collect::<Vec<_>>())
            .finish()
    }
}

impl Drop for ResourceLockGuard {
    fn drop(&mut self) {
        let keys: Vec<LockKey> = self.held.drain(..).map(|(key, _guard)| key).collect();
        prune(&self.table, &keys);
    }
}

/// Registry of per-resource locks
#[derive(Debug, Default)]
pub struct ResourceLocks {
    table: Arc<LockTable>,
}

impl ResourceLocks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the locks of all given resources.
    /// Keys are taken in sorted order so overlapping requests cannot deadlock.
    pub async fn acquire(&self, mut keys: Vec<LockKey>) -> ResourceLockGuard {
        keys.sort();
        keys.dedup();

        let mut guard = ResourceLockGuard {
            held: Vec::with_capacity(keys.len()),
            table: self.table.clone(),
        };
        for key in keys {
            let lock = {
                let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
                table.entry(key.clone()).or_default().clone()
            };
            let pending = PendingEntry {
                key,
                table: &self.table,
            };
            let acquired = pending.lock(lock).await;
            guard.held.push(acquired);
        }

        guard
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.table.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

/// A key whose registry entry was taken but not yet locked.
/// Dropping it while waiting (a cancelled request) still prunes the entry.
struct PendingEntry<'a> {
    key: LockKey,
    table: &'a LockTable,
}

impl PendingEntry<'_> {
    async fn lock(self, lock: Arc<Mutex<()>>) -> (LockKey, OwnedMutexGuard<()>) {
        let guard = lock.lock_owned().await;
        (self.key.clone(), guard)
    }
}

impl Drop for PendingEntry<'_> {
    fn drop(&mut self) {
        prune(self.table, std::slice::from_ref(&self.key));
    }
}

/// Remove entries nobody holds or waits on any more
fn prune(table: &LockTable, keys: &[LockKey]) {
    let mut table = table.lock().unwrap_or_else(PoisonError::into_inner);
    for key in keys {
        if table.get(key).is_some_and(|lock| Arc::strong_count(lock) == 1) {
            table.remove(key);
        }
    }
}
