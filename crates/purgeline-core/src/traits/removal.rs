// SPDX-FileCopyrightText: 2026 Purgeline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Removal adapter trait for the remote service that owns the archived items.

use async_trait::async_trait;

use crate::error::PurgeError;
use crate::traits::adapter::PluginAdapter;
use crate::types::RemovalOutcome;

/// Deletes a single item from the remote service.
///
/// The purge scheduler calls [`remove`](RemovalAdapter::remove) at most once
/// per dispatch and never faster than the configured rate limit. Implementations
/// must not retry internally; retry policy belongs to the scheduler.
#[async_trait]
pub trait RemovalAdapter: PluginAdapter {
    /// Removes the item with the given identifier.
    ///
    /// An item that no longer exists remotely should be reported as
    /// [`RemovalOutcome::AlreadyGone`], not as an error.
    async fn remove(&self, id: &str) -> Result<RemovalOutcome, PurgeError>;
}
