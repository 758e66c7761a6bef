// SPDX-FileCopyrightText: 2026 Purgeline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions for Purgeline's external collaborators.
//!
//! All adapters extend the [`PluginAdapter`] base trait and use
//! `#[async_trait]` for dynamic dispatch compatibility.

pub mod adapter;
pub mod audit;
pub mod removal;

pub use adapter::PluginAdapter;
pub use audit::AuditProvider;
pub use removal::RemovalAdapter;
