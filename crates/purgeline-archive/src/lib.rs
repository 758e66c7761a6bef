// SPDX-FileCopyrightText: 2026 Purgeline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Record store, filter pipeline, and archive ingestion for Purgeline.
//!
//! - [`RecordStore`]: ordered, removal-only collection shared with the purge scheduler
//! - [`filter::apply`]: pure, order-preserving view derivation
//! - [`highlight::highlight`]: keyword segmentation for display
//! - [`ingest`]: export parsing into typed records

pub mod filter;
pub mod highlight;
pub mod ingest;
pub mod store;

pub use filter::{apply, FilterConfig, PreviewMode};
pub use highlight::{highlight, Segment};
pub use ingest::{load_archive, parse_archive};
pub use store::RecordStore;
