// SPDX-FileCopyrightText: 2026 Purgeline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Audit annotation store for Purgeline.
//!
//! [`AuditStore`] sends a capped batch of records to an
//! [`AuditProvider`](purgeline_core::AuditProvider), validates the raw
//! payload against the audit schema, and keeps the results keyed by id.

pub mod prompt;
pub mod schema;
pub mod store;

pub use prompt::{build_audit_prompt, AUDIT_SYSTEM_PROMPT};
pub use schema::parse_audit_response;
pub use store::{AuditMap, AuditStore};
