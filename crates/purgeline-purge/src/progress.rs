// SPDX-FileCopyrightText: 2026 Purgeline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Observable scheduler state.
//!
//! The scheduler owns one [`PurgeStatus`] and publishes it over a `watch`
//! channel; everyone else reads copies.

use chrono::{DateTime, Utc};
use purgeline_core::Category;

/// Lifecycle of the scheduler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum PurgeState {
    #[default]
    Idle,
    Purging,
    /// The last run drained its queue; shown until the display window ends.
    Completed,
}

/// Live counters of an active run.
///
/// `completed + remaining == total` holds in every published snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurgeProgress {
    pub total: usize,
    /// Items resolved: removed, already gone, or given up on.
    pub completed: usize,
    pub remaining: usize,
    /// Failed removal attempts so far, retried or not.
    pub failed: usize,
    /// Items given up on after their last attempt failed; counted in `completed`.
    pub skipped: usize,
    pub started_at: DateTime<Utc>,
    /// Category of the most recently dispatched item.
    pub current_category: Option<Category>,
    /// Cosmetic seconds until the next dispatch.
    pub seconds_to_next: u64,
}

impl PurgeProgress {
    pub fn new(total: usize, started_at: DateTime<Utc>) -> Self {
        Self {
            total,
            completed: 0,
            remaining: total,
            failed: 0,
            skipped: 0,
            started_at,
            current_category: None,
            seconds_to_next: 0,
        }
    }

    /// Fraction of the run resolved, in `0.0..=1.0`.
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        self.completed as f64 / self.total as f64
    }
}

/// Outcome of a finished or cancelled run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurgeSummary {
    pub total: usize,
    pub completed: usize,
    pub failed: usize,
    /// Records given up on after exhausting their attempts; they remain in the store.
    pub skipped: usize,
    pub cancelled: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl PurgeSummary {
    pub fn from_progress(progress: &PurgeProgress, cancelled: bool, finished_at: DateTime<Utc>) -> Self {
        Self {
            total: progress.total,
            completed: progress.completed,
            failed: progress.failed,
            skipped: progress.skipped,
            cancelled,
            started_at: progress.started_at,
            finished_at,
        }
    }

    /// Items actually gone from the store.
    pub fn removed(&self) -> usize {
        self.completed - self.skipped
    }
}

/// Snapshot published by the scheduler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PurgeStatus {
    pub state: PurgeState,
    /// Present only while purging.
    pub progress: Option<PurgeProgress>,
    pub last_summary: Option<PurgeSummary>,
}

impl PurgeStatus {
    pub fn is_purging(&self) -> bool {
        self.state == PurgeState::Purging
    }
}
