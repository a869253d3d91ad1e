//! Per-user snapshot cache
//!
//! An entry is valid while the user's ledger head and the requested "today"
//! are unchanged. Appends for other users never invalidate it, and a new
//! event for the user simply moves the head, so no explicit invalidation
//! call exists.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use chrono::NaiveDate;

use crate::ids::UserId;
use crate::ledger::LedgerCursor;
use crate::snapshot::DashboardSnapshot;

/// Result of [`SnapshotCache::swap`]
#[derive(Debug, Clone)]
pub enum CacheSwap {
    /// The user's head moved forward; carries the snapshot it replaced
    Advanced(Option<Arc<DashboardSnapshot>>),
    /// Same head, stored again for another "today"
    Refreshed,
    /// A newer snapshot is cached; nothing was stored
    Stale,
}

#[derive(Debug, Clone)]
struct Entry {
    user_head: LedgerCursor,
    today: Option<NaiveDate>,
    snapshot: Arc<DashboardSnapshot>,
}

/// Latest snapshot per user
#[derive(Debug, Default)]
pub struct SnapshotCache {
    entries: RwLock<BTreeMap<UserId, Entry>>,
}

impl SnapshotCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached snapshot for exactly this user head and day.
    pub fn get(
        &self,
        user: &UserId,
        user_head: LedgerCursor,
        today: Option<NaiveDate>,
    ) -> Option<Arc<DashboardSnapshot>> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries
            .get(user)
            .filter(|e| e.user_head == user_head && e.today == today)
            .map(|e| Arc::clone(&e.snapshot))
    }

    /// Stores a snapshot unless a newer one is already cached.
    ///
    /// The check and the store happen under one write lock, so exactly one
    /// caller observes each advance of a user's head.
    pub fn swap(
        &self,
        user: &UserId,
        user_head: LedgerCursor,
        today: Option<NaiveDate>,
        snapshot: Arc<DashboardSnapshot>,
    ) -> CacheSwap {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        let outcome = match entries.get(user) {
            Some(existing) if existing.user_head > user_head => return CacheSwap::Stale,
            Some(existing) if existing.user_head == user_head => CacheSwap::Refreshed,
            Some(existing) => CacheSwap::Advanced(Some(Arc::clone(&existing.snapshot))),
            None => CacheSwap::Advanced(None),
        };
        entries.insert(
            user.clone(),
            Entry {
                user_head,
                today,
                snapshot,
            },
        );
        outcome
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogLoader;
    use crate::snapshot::{LevelTable, SnapshotBuilder};

    fn snapshot(user: &UserId, head: u64) -> Arc<DashboardSnapshot> {
        let catalog = CatalogLoader::new().build().unwrap();
        let levels = LevelTable::default_table();
        let built = SnapshotBuilder::new(&catalog, &levels)
            .build(user, &[], LedgerCursor::new(head), None)
            .unwrap();
        Arc::new(built)
    }

    #[test]
    fn test_swap_reports_each_advance_once() {
        let cache = SnapshotCache::new();
        let alice = UserId::from("alice");
        let head = LedgerCursor::new(3);

        assert!(matches!(cache.swap(&alice, head, None, snapshot(&alice, 3)), CacheSwap::Advanced(None)));
        assert!(matches!(cache.swap(&alice, head, None, snapshot(&alice, 3)), CacheSwap::Refreshed));

        let next = LedgerCursor::new(5);
        match cache.swap(&alice, next, None, snapshot(&alice, 5)) {
            CacheSwap::Advanced(Some(previous)) => assert_eq!(previous.cursor, head),
            other => panic!("expected an advance, got {:?}", other),
        }
        assert!(cache.get(&alice, next, None).is_some());
    }

    #[test]
    fn test_swap_keeps_newer_entry() {
        let cache = SnapshotCache::new();
        let alice = UserId::from("alice");
        cache.swap(&alice, LedgerCursor::new(5), None, snapshot(&alice, 5));

        let old = LedgerCursor::new(2);
        assert!(matches!(cache.swap(&alice, old, None, snapshot(&alice, 2)), CacheSwap::Stale));
        assert!(cache.get(&alice, old, None).is_none());
        assert!(cache.get(&alice, LedgerCursor::new(5), None).is_some());
        assert_eq!(cache.len(), 1);
    }
}
