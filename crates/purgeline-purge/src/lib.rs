// SPDX-FileCopyrightText: 2026 Purgeline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rate-limited purge scheduling for Purgeline.
//!
//! [`PurgeScheduler`] turns a filtered view into a work queue and removes one
//! record per interval through a [`RemovalAdapter`](purgeline_core::RemovalAdapter),
//! publishing [`PurgeStatus`] snapshots as it goes.

pub mod progress;
pub mod scheduler;
pub mod timer;

pub use progress::{PurgeProgress, PurgeState, PurgeStatus, PurgeSummary};
pub use scheduler::{PurgeScheduler, SchedulerSettings};
pub use timer::{schedule, TimerHandle};
