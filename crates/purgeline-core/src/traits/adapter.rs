// SPDX-FileCopyrightText: 2026 Purgeline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base adapter trait that all external collaborators implement.

use async_trait::async_trait;

use crate::error::PurgeError;
use crate::types::{AdapterType, HealthStatus};

/// The base trait for all Purgeline adapters.
///
/// Every adapter (removal, audit) provides identity and a health check so
/// the binary can report which collaborator it is talking to.
#[async_trait]
pub trait PluginAdapter: Send + Sync + 'static {
    /// Returns the human-readable name of this adapter instance.
    fn name(&self) -> &str;

    /// Returns the semantic version of this adapter.
    fn version(&self) -> semver::Version;

    /// Returns the role this adapter plays.
    fn adapter_type(&self) -> AdapterType;

    /// Performs a health check and returns the adapter's current status.
    async fn health_check(&self) -> Result<HealthStatus, PurgeError>;
}
