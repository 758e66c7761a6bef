// SPDX-FileCopyrightText: 2026 Purgeline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory record store.
//!
//! The store keeps records in insertion order and is only ever mutated by
//! removal. Every removal bumps a generation counter published over a
//! `watch` channel so views can be re-derived; reads always see the latest
//! write.

use std::collections::HashSet;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use purgeline_core::Record;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::filter::{self, FilterConfig};

/// Ordered, removal-only collection of records.
#[derive(Debug)]
pub struct RecordStore {
    records: RwLock<Vec<Record>>,
    generation: watch::Sender<u64>,
}

impl RecordStore {
    /// Build a store from ingested records.
    ///
    /// Identifiers must be unique: later duplicates are dropped with a warning.
    pub fn new(records: Vec<Record>) -> Self {
        let mut seen = HashSet::with_capacity(records.len());
        let mut unique = Vec::with_capacity(records.len());
        for record in records {
            if seen.insert(record.id().to_string()) {
                unique.push(record);
            } else {
                warn!(id = record.id(), "dropping duplicate record id");
            }
        }

        let (generation, _) = watch::channel(0);
        Self {
            records: RwLock::new(unique),
            generation,
        }
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.read().iter().any(|r| r.id() == id)
    }

    pub fn get(&self, id: &str) -> Option<Record> {
        self.read().iter().find(|r| r.id() == id).cloned()
    }

    /// A copy of every record, in insertion order.
    pub fn snapshot(&self) -> Vec<Record> {
        self.read().clone()
    }

    /// The filtered view over the current contents.
    pub fn filtered(&self, config: &FilterConfig) -> Vec<Record> {
        filter::apply(&self.read(), config)
    }

    /// Remove a record by id, returning it if it was present.
    ///
    /// Removing an absent id is a no-op and does not bump the generation.
    pub fn remove(&self, id: &str) -> Option<Record> {
        let removed = {
            let mut records = self.write();
            let index = records.iter().position(|r| r.id() == id)?;
            records.remove(index)
        };
        self.generation.send_modify(|g| *g += 1);
        debug!(id, "record removed from store");
        Some(removed)
    }

    /// Current generation; increments once per successful removal.
    pub fn generation(&self) -> u64 {
        *self.generation.borrow()
    }

    /// Subscribe to removal notifications.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.generation.subscribe()
    }

    // Records are immutable values, so a panic mid-read cannot leave them
    // half-written; recover the guard instead of propagating poison.
    fn read(&self) -> RwLockReadGuard<'_, Vec<Record>> {
        self.records.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Record>> {
        self.records.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use purgeline_test_utils::fixtures::{post, reply};

    #[test]
    fn duplicates_are_dropped_keeping_the_first() {
        let store = RecordStore::new(vec![post("1", "first"), post("2", "b"), post("1", "again")]);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("1").map(|r| r.text().to_string()).as_deref(), Some("first"));
    }

    #[test]
    fn remove_preserves_order_and_bumps_generation() {
        let store = RecordStore::new(vec![post("1", "a"), post("2", "b"), post("3", "c")]);
        assert_eq!(store.generation(), 0);

        let removed = store.remove("2").expect("present");
        assert_eq!(removed.id(), "2");
        assert_eq!(store.generation(), 1);

        let ids: Vec<String> = store.snapshot().iter().map(|r| r.id().to_string()).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[test]
    fn removing_missing_id_is_a_noop() {
        let store = RecordStore::new(vec![post("1", "a")]);
        assert!(store.remove("nope").is_none());
        assert_eq!(store.generation(), 0);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn filtered_view_reflects_latest_removal() {
        let store = RecordStore::new(vec![post("1", "ugh"), reply("2", "ugh too", "1")]);
        let config = FilterConfig::new().with_keywords(["ugh"]);
        assert_eq!(store.filtered(&config).len(), 2);

        store.remove("1");
        let view = store.filtered(&config);
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].id(), "2");
    }

    #[tokio::test]
    async fn subscribers_see_removals() {
        let store = RecordStore::new(vec![post("1", "a")]);
        let mut rx = store.subscribe();
        store.remove("1");
        rx.changed().await.expect("sender alive");
        assert_eq!(*rx.borrow(), 1);
        assert!(store.is_empty());
    }
}
