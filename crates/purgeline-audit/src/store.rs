// SPDX-FileCopyrightText: 2026 Purgeline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Audit annotation store.
//!
//! Holds the latest classification per record id. Each call to
//! [`AuditStore::request_audit`] classifies at most `batch_cap` records and
//! merges the validated results over whatever was there before. Entries for
//! records that have since been purged are simply never looked up.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock};

use purgeline_core::{AuditProvider, AuditResult, PurgeError, Record};
use tracing::{info, warn};

use crate::schema::parse_audit_response;

/// Mapping from record id to its classification.
pub type AuditMap = HashMap<String, AuditResult>;

/// Store of audit annotations backed by an external classifier.
pub struct AuditStore {
    provider: Arc<dyn AuditProvider>,
    batch_cap: usize,
    results: RwLock<AuditMap>,
}

impl AuditStore {
    /// Create a store that sends at most `batch_cap` records per call.
    pub fn new(provider: Arc<dyn AuditProvider>, batch_cap: usize) -> Self {
        Self {
            provider,
            batch_cap: batch_cap.max(1),
            results: RwLock::new(HashMap::new()),
        }
    }

    pub fn batch_cap(&self) -> usize {
        self.batch_cap
    }

    /// Classify the head of `records` and merge the results.
    ///
    /// Only the first `batch_cap` records are sent. The returned mapping
    /// holds exactly the validated entries from this call. On collaborator
    /// failure or an unparsable payload the store is left untouched and
    /// [`PurgeError::AuditUnavailable`] is returned; callers treat that as
    /// an empty mapping.
    pub async fn request_audit(&self, records: &[Record]) -> Result<AuditMap, PurgeError> {
        let batch = &records[..records.len().min(self.batch_cap)];
        if batch.is_empty() {
            return Ok(HashMap::new());
        }
        if records.len() > batch.len() {
            info!(
                requested = records.len(),
                cap = self.batch_cap,
                "audit batch truncated to cap"
            );
        }

        let raw = self.provider.classify(batch).await.map_err(|e| {
            warn!(provider = self.provider.name(), error = %e, "audit call failed");
            match e {
                PurgeError::AuditUnavailable { .. } => e,
                other => PurgeError::AuditUnavailable {
                    message: other.to_string(),
                    source: Some(Box::new(other)),
                },
            }
        })?;

        let allowed: HashSet<&str> = batch.iter().map(Record::id).collect();
        let fresh = parse_audit_response(&raw, &allowed).inspect_err(|e| {
            warn!(error = %e, "audit payload rejected");
        })?;

        self.results
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(fresh.iter().map(|(id, r)| (id.clone(), r.clone())));

        info!(
            sent = batch.len(),
            annotated = fresh.len(),
            "audit completed"
        );
        Ok(fresh)
    }

    /// The annotation for one record, if any.
    pub fn get(&self, id: &str) -> Option<AuditResult> {
        self.results
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    /// Annotations for the given live records; orphaned entries are ignored.
    pub fn annotations_for(&self, records: &[Record]) -> AuditMap {
        let results = self.results.read().unwrap_or_else(PoisonError::into_inner);
        records
            .iter()
            .filter_map(|r| results.get(r.id()).map(|a| (r.id().to_string(), a.clone())))
            .collect()
    }

    /// Number of stored annotations, orphans included.
    pub fn len(&self) -> usize {
        self.results
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.results
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use purgeline_core::RiskLevel;
    use purgeline_test_utils::fixtures::{post, posts};
    use purgeline_test_utils::MockAuditProvider;

    fn entry(id: &str, level: &str) -> String {
        format!(r#"{{"id": "{id}", "reason": "r{id}", "riskLevel": "{level}", "sentiment": "s"}}"#)
    }

    #[tokio::test]
    async fn only_valid_entries_are_admitted() {
        let provider = Arc::new(MockAuditProvider::new().with_response(format!(
            r#"[{{"reason": "no id", "riskLevel": "High", "sentiment": "s"}}, {}]"#,
            entry("2", "Medium")
        )));
        let store = AuditStore::new(provider, 10);

        let results = store.request_audit(&posts(3)).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results["2"].risk_level, RiskLevel::Medium);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn batch_is_capped() {
        let provider = Arc::new(MockAuditProvider::new());
        let store = AuditStore::new(provider.clone(), 2);

        store.request_audit(&posts(5)).await.unwrap();
        assert_eq!(provider.batches().await, vec![vec!["1".to_string(), "2".to_string()]]);
    }

    #[tokio::test]
    async fn ids_beyond_the_cap_are_not_admitted() {
        let provider = Arc::new(MockAuditProvider::new().with_response(format!(
            "[{}, {}]",
            entry("1", "Low"),
            entry("3", "High")
        )));
        let store = AuditStore::new(provider, 2);

        let results = store.request_audit(&posts(3)).await.unwrap();
        assert!(results.contains_key("1"));
        assert!(!results.contains_key("3"), "record 3 was never sent");
    }

    #[tokio::test]
    async fn failure_leaves_store_untouched() {
        let provider = Arc::new(
            MockAuditProvider::new()
                .with_response(format!("[{}]", entry("1", "High")))
                .with_failure("503 from upstream")
                .with_response("garbage"),
        );
        let store = AuditStore::new(provider, 10);
        let batch = posts(1);

        store.request_audit(&batch).await.unwrap();
        let err = store.request_audit(&batch).await.unwrap_err();
        assert!(matches!(err, PurgeError::AuditUnavailable { .. }));
        let err = store.request_audit(&batch).await.unwrap_err();
        assert!(matches!(err, PurgeError::AuditUnavailable { .. }));

        assert_eq!(store.get("1").map(|r| r.risk_level), Some(RiskLevel::High));
    }

    #[tokio::test]
    async fn later_audits_overwrite_and_augment() {
        let provider = Arc::new(
            MockAuditProvider::new()
                .with_response(format!("[{}]", entry("1", "Low")))
                .with_response(format!("[{}, {}]", entry("1", "High"), entry("2", "Medium"))),
        );
        let store = AuditStore::new(provider, 10);
        let batch = posts(2);

        store.request_audit(&batch).await.unwrap();
        store.request_audit(&batch).await.unwrap();
        assert_eq!(store.get("1").map(|r| r.risk_level), Some(RiskLevel::High));
        assert_eq!(store.get("2").map(|r| r.risk_level), Some(RiskLevel::Medium));
    }

    #[tokio::test]
    async fn orphans_are_ignored_by_lookups() {
        let provider = Arc::new(MockAuditProvider::new().with_response(format!(
            "[{}, {}]",
            entry("1", "Low"),
            entry("2", "High")
        )));
        let store = AuditStore::new(provider, 10);
        store.request_audit(&posts(2)).await.unwrap();

        // Record 1 was purged; only record 2 is still live.
        let live = vec![post("2", "post number 2")];
        let annotations = store.annotations_for(&live);
        assert_eq!(annotations.len(), 1);
        assert!(annotations.contains_key("2"));
        assert_eq!(store.len(), 2, "orphans stay until cleared");

        store.clear();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn empty_input_skips_the_provider() {
        let provider = Arc::new(MockAuditProvider::new());
        let store = AuditStore::new(provider.clone(), 10);
        assert!(store.request_audit(&[]).await.unwrap().is_empty());
        assert!(provider.batches().await.is_empty());
    }
}
