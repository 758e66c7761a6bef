// SPDX-FileCopyrightText: 2026 Purgeline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock removal adapter for deterministic scheduler tests.
//!
//! `MockRemover` records the (virtual) instant of every call so tests can
//! assert on dispatch cadence under `tokio::time::pause`.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use async_trait::async_trait;
use purgeline_core::{
    AdapterType, HealthStatus, PluginAdapter, PurgeError, RemovalAdapter, RemovalOutcome,
};
use tokio::sync::Mutex;
use tokio::time::Instant;

/// One recorded call to [`RemovalAdapter::remove`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovalCall {
    pub id: String,
    pub at: Instant,
}

/// A removal adapter that succeeds unless told otherwise.
#[derive(Default)]
pub struct MockRemover {
    calls: Mutex<Vec<RemovalCall>>,
    /// Remaining forced failures per id.
    failures: Mutex<HashMap<String, u32>>,
    gone: HashSet<String>,
    latency: Option<Duration>,
}

impl MockRemover {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call sleeps for `latency` before answering.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// The remote reports these ids as already deleted.
    pub fn with_gone<I: IntoIterator<Item = S>, S: Into<String>>(mut self, ids: I) -> Self {
        self.gone.extend(ids.into_iter().map(Into::into));
        self
    }

    /// The next `times` calls for `id` fail.
    pub fn with_failures(mut self, id: &str, times: u32) -> Self {
        self.failures.get_mut().insert(id.to_string(), times);
        self
    }

    /// All calls so far, in order.
    pub async fn calls(&self) -> Vec<RemovalCall> {
        self.calls.lock().await.clone()
    }

    /// Ids of all calls so far, in order.
    pub async fn called_ids(&self) -> Vec<String> {
        self.calls.lock().await.iter().map(|c| c.id.clone()).collect()
    }
}

#[async_trait]
impl PluginAdapter for MockRemover {
    fn name(&self) -> &str {
        "mock-remover"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Removal
    }

    async fn health_check(&self) -> Result<HealthStatus, PurgeError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl RemovalAdapter for MockRemover {
    async fn remove(&self, id: &str) -> Result<RemovalOutcome, PurgeError> {
        self.calls.lock().await.push(RemovalCall {
            id: id.to_string(),
            at: Instant::now(),
        });

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        {
            let mut failures = self.failures.lock().await;
            if let Some(remaining) = failures.get_mut(id)
                && *remaining > 0
            {
                *remaining -= 1;
                return Err(PurgeError::removal(id, "mock failure"));
            }
        }

        if self.gone.contains(id) {
            Ok(RemovalOutcome::AlreadyGone)
        } else {
            Ok(RemovalOutcome::Removed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn succeeds_and_records_calls() {
        let remover = MockRemover::new();
        assert_eq!(remover.remove("1").await.unwrap(), RemovalOutcome::Removed);
        assert_eq!(remover.called_ids().await, vec!["1"]);
    }

    #[tokio::test]
    async fn forced_failures_run_out() {
        let remover = MockRemover::new().with_failures("1", 1);
        assert!(remover.remove("1").await.is_err());
        assert!(remover.remove("1").await.is_ok());
    }

    #[tokio::test]
    async fn gone_ids_report_already_gone() {
        let remover = MockRemover::new().with_gone(["9"]);
        assert_eq!(remover.remove("9").await.unwrap(), RemovalOutcome::AlreadyGone);
    }

    #[tokio::test(start_paused = true)]
    async fn latency_uses_virtual_time() {
        let remover = MockRemover::new().with_latency(Duration::from_secs(30));
        let start = Instant::now();
        remover.remove("1").await.unwrap();
        assert!(start.elapsed() >= Duration::from_secs(30));
    }
}
