// SPDX-FileCopyrightText: 2026 Purgeline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Audit provider trait for the external content-risk classifier.

use async_trait::async_trait;

use crate::error::PurgeError;
use crate::traits::adapter::PluginAdapter;
use crate::types::Record;

/// Batch classifier that rates records for content risk.
///
/// The provider returns the raw payload untouched. Validation against the
/// audit schema happens in the annotation store, so a provider never has to
/// trust its own upstream.
#[async_trait]
pub trait AuditProvider: PluginAdapter {
    /// Classifies the given batch and returns the raw response text.
    ///
    /// The caller has already truncated `batch` to the agreed cap.
    async fn classify(&self, batch: &[Record]) -> Result<String, PurgeError>;
}
