// SPDX-FileCopyrightText: 2026 Purgeline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Purgeline workspace.

use thiserror::Error;

/// The primary error type used across all Purgeline adapter traits and core operations.
///
/// Every variant is recoverable: nothing in the filter, audit, or purge path
/// is allowed to take the process down.
#[derive(Debug, Error)]
pub enum PurgeError {
    /// Configuration errors surfaced at runtime (bad header values, missing credentials).
    #[error("configuration error: {0}")]
    Config(String),

    /// The archive export could not be read or is not a recognizable document.
    #[error("archive error: {message}")]
    Archive {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The audit collaborator failed or returned an unusable payload.
    ///
    /// Callers treat this as "audit unavailable": records stay unannotated.
    #[error("audit unavailable: {message}")]
    AuditUnavailable {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A single remote removal failed.
    #[error("removal of {id} failed: {message}")]
    Removal {
        id: String,
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A purge run is already in progress.
    #[error("a purge is already running")]
    AlreadyRunning,

    /// A purge was requested over an empty view.
    #[error("nothing to purge: the work queue is empty")]
    EmptyQueue,

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl PurgeError {
    /// Shorthand for an [`AuditUnavailable`](Self::AuditUnavailable) error without a source.
    pub fn audit_unavailable(message: impl Into<String>) -> Self {
        Self::AuditUnavailable {
            message: message.into(),
            source: None,
        }
    }

    /// Shorthand for a [`Removal`](Self::Removal) error without a source.
    pub fn removal(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Removal {
            id: id.into(),
            message: message.into(),
            source: None,
        }
    }
}
