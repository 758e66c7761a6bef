// SPDX-FileCopyrightText: 2026 Purgeline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for Purgeline.
//!
//! This crate provides the record model, the workspace error type, and the
//! adapter traits for the two external collaborators: the remote removal
//! service and the audit classifier.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::PurgeError;
pub use types::{
    AdapterType, AuditResult, Category, HealthStatus, Record, RecordDraft, RemovalOutcome,
    ReplyTarget, RiskLevel,
};

pub use traits::{AuditProvider, PluginAdapter, RemovalAdapter};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn purge_error_messages() {
        let err = PurgeError::removal("42", "HTTP 500");
        assert_eq!(err.to_string(), "removal of 42 failed: HTTP 500");

        let err = PurgeError::audit_unavailable("timeout");
        assert_eq!(err.to_string(), "audit unavailable: timeout");

        assert_eq!(
            PurgeError::EmptyQueue.to_string(),
            "nothing to purge: the work queue is empty"
        );
    }

    #[test]
    fn adapter_type_round_trips() {
        use std::str::FromStr;

        for variant in [AdapterType::Removal, AdapterType::Audit] {
            let parsed = AdapterType::from_str(&variant.to_string()).expect("should parse back");
            assert_eq!(variant, parsed);
        }
    }

    #[test]
    fn all_traits_are_exported() {
        fn _assert_plugin_adapter<T: PluginAdapter>() {}
        fn _assert_removal_adapter<T: RemovalAdapter>() {}
        fn _assert_audit_provider<T: AuditProvider>() {}
    }
}
