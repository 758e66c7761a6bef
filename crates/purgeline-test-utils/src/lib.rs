// SPDX-FileCopyrightText: 2026 Purgeline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Purgeline.
//!
//! Provides mock collaborators and record fixtures for fast, deterministic
//! tests without network access.
//!
//! # Components
//!
//! - [`MockRemover`] - Removal adapter that records call instants and can fail on demand
//! - [`MockAuditProvider`] - Audit provider with pre-configured raw responses
//! - [`fixtures`] - Record builders

pub mod fixtures;
pub mod mock_audit;
pub mod mock_remover;

pub use mock_audit::MockAuditProvider;
pub use mock_remover::MockRemover;
