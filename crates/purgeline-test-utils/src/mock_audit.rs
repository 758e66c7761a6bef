// SPDX-FileCopyrightText: 2026 Purgeline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock audit provider returning pre-configured raw payloads.

use std::collections::VecDeque;

use async_trait::async_trait;
use purgeline_core::{AdapterType, AuditProvider, HealthStatus, PluginAdapter, PurgeError, Record};
use tokio::sync::Mutex;

/// An audit provider whose responses are popped from a FIFO queue.
///
/// When the queue is empty the provider answers with an empty JSON array.
#[derive(Default)]
pub struct MockAuditProvider {
    responses: Mutex<VecDeque<Result<String, String>>>,
    batches: Mutex<Vec<Vec<String>>>,
}

impl MockAuditProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful raw response.
    pub fn with_response(mut self, body: impl Into<String>) -> Self {
        self.responses.get_mut().push_back(Ok(body.into()));
        self
    }

    /// Queue a failed call.
    pub fn with_failure(mut self, message: impl Into<String>) -> Self {
        self.responses.get_mut().push_back(Err(message.into()));
        self
    }

    /// Ids of every batch received, in call order.
    pub async fn batches(&self) -> Vec<Vec<String>> {
        self.batches.lock().await.clone()
    }
}

#[async_trait]
impl PluginAdapter for MockAuditProvider {
    fn name(&self) -> &str {
        "mock-audit"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Audit
    }

    async fn health_check(&self) -> Result<HealthStatus, PurgeError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl AuditProvider for MockAuditProvider {
    async fn classify(&self, batch: &[Record]) -> Result<String, PurgeError> {
        self.batches
            .lock()
            .await
            .push(batch.iter().map(|r| r.id().to_string()).collect());

        match self.responses.lock().await.pop_front() {
            Some(Ok(body)) => Ok(body),
            Some(Err(message)) => Err(PurgeError::audit_unavailable(message)),
            None => Ok("[]".to_string()),
        }
    }
}
