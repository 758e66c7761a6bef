// SPDX-FileCopyrightText: 2026 Purgeline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rate-limited purge scheduler.
//!
//! A run consumes a snapshot of the filtered view as its queue and issues one
//! removal per dispatch tick. Dispatch ticks come from a tokio interval with
//! [`MissedTickBehavior::Delay`], so consecutive dispatch starts are never
//! closer than the configured interval no matter how long a removal takes.
//!
//! State machine: `Idle -> Purging -> Completed -> Idle`, with `stop` taking
//! `Purging` straight back to `Idle`.

use std::collections::VecDeque;
use std::sync::{Arc, PoisonError, Weak};
use std::time::Duration;

use chrono::{DateTime, Utc};
use purgeline_archive::{FilterConfig, RecordStore};
use purgeline_config::model::PurgeConfig;
use purgeline_core::{PurgeError, Record, RemovalAdapter, RemovalOutcome};
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{interval, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::progress::{PurgeProgress, PurgeState, PurgeStatus, PurgeSummary};
use crate::timer::{self, TimerHandle};

/// Timing and retry policy for a scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerSettings {
    /// Minimum spacing between dispatch starts.
    pub interval: Duration,
    /// How long `Completed` is shown before returning to `Idle`.
    pub display_window: Duration,
    /// Attempts per item; a failure on the last one skips the item.
    pub max_attempts: u32,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self::from(&PurgeConfig::default())
    }
}

impl From<&PurgeConfig> for SchedulerSettings {
    fn from(config: &PurgeConfig) -> Self {
        Self {
            interval: config.dispatch_interval(),
            display_window: config.completion_display(),
            max_attempts: config.max_attempts.max(1),
        }
    }
}

struct Pending {
    record: Record,
    attempts: u32,
}

#[derive(Clone, Copy)]
enum Resolution {
    Done,
    Requeued,
    Skipped,
}

impl Resolution {
    fn count(self, completed: &mut usize, failed: &mut usize, skipped: &mut usize) {
        match self {
            Resolution::Done => *completed += 1,
            Resolution::Requeued => *failed += 1,
            Resolution::Skipped => {
                *completed += 1;
                *failed += 1;
                *skipped += 1;
            }
        }
    }
}

/// State shared between the scheduler handle and its run task.
struct Shared {
    store: Arc<RecordStore>,
    remover: Arc<dyn RemovalAdapter>,
    settings: SchedulerSettings,
    status: watch::Sender<PurgeStatus>,
    display_timer: std::sync::Mutex<Option<TimerHandle>>,
}

struct ActiveRun {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

/// Drives removals from a work queue at a fixed rate.
///
/// The scheduler is the only writer of the [`RecordStore`] it was given.
pub struct PurgeScheduler {
    shared: Arc<Shared>,
    run: Mutex<Option<ActiveRun>>,
}

impl PurgeScheduler {
    pub fn new(
        store: Arc<RecordStore>,
        remover: Arc<dyn RemovalAdapter>,
        settings: SchedulerSettings,
    ) -> Self {
        let (status, _) = watch::channel(PurgeStatus::default());
        Self {
            shared: Arc::new(Shared {
                store,
                remover,
                settings,
                status,
                display_timer: std::sync::Mutex::new(None),
            }),
            run: Mutex::new(None),
        }
    }

    pub fn settings(&self) -> SchedulerSettings {
        self.shared.settings
    }

    /// Copy of the current status.
    pub fn status(&self) -> PurgeStatus {
        self.shared.status.borrow().clone()
    }

    /// Receiver for status snapshots.
    pub fn subscribe(&self) -> watch::Receiver<PurgeStatus> {
        self.shared.status.subscribe()
    }

    /// Start a run over `queue`, captured by value.
    ///
    /// Allowed from `Idle` and `Completed`. The first dispatch happens
    /// immediately.
    pub async fn start(&self, queue: Vec<Record>) -> Result<(), PurgeError> {
        let mut run = self.run.lock().await;
        if self.shared.status.borrow().is_purging() {
            return Err(PurgeError::AlreadyRunning);
        }
        if queue.is_empty() {
            return Err(PurgeError::EmptyQueue);
        }

        // A stopped run may still be finishing its in-flight removal.
        if let Some(previous) = run.take() {
            previous.cancel.cancel();
            if let Err(e) = previous.task.await {
                warn!(error = %e, "previous purge task ended abnormally");
            }
        }
        self.shared.cancel_display_timer();

        let total = queue.len();
        let started_at = Utc::now();
        self.shared.status.send_modify(|status| {
            status.state = PurgeState::Purging;
            status.progress = Some(PurgeProgress::new(total, started_at));
        });

        let cancel = CancellationToken::new();
        let task = tokio::spawn(run_purge(
            Arc::clone(&self.shared),
            queue,
            started_at,
            cancel.clone(),
        ));
        *run = Some(ActiveRun { cancel, task });

        info!(
            total,
            interval_ms = self.shared.settings.interval.as_millis() as u64,
            max_attempts = self.shared.settings.max_attempts,
            "purge started"
        );
        Ok(())
    }

    /// Start a run over the store's current filtered view. Returns the queue length.
    pub async fn start_filtered(&self, filter: &FilterConfig) -> Result<usize, PurgeError> {
        let queue = self.shared.store.filtered(filter);
        let total = queue.len();
        self.start(queue).await?;
        Ok(total)
    }

    /// Cancel the current run and return to `Idle` immediately.
    ///
    /// Undispatched items stay in the store. A removal already in flight is
    /// allowed to finish and is counted in the cancelled run's summary once it
    /// resolves. Returns `false` when there was nothing to stop.
    pub async fn stop(&self) -> bool {
        let run = self.run.lock().await;
        if let Some(active) = run.as_ref() {
            active.cancel.cancel();
        }
        self.shared.cancel_display_timer();

        let finished_at = Utc::now();
        let stopped = self.shared.status.send_if_modified(|status| match status.state {
            PurgeState::Idle => false,
            PurgeState::Purging => {
                if let Some(progress) = status.progress.take() {
                    status.last_summary =
                        Some(PurgeSummary::from_progress(&progress, true, finished_at));
                }
                status.state = PurgeState::Idle;
                true
            }
            PurgeState::Completed => {
                status.state = PurgeState::Idle;
                true
            }
        });

        if stopped {
            info!("purge stopped");
        }
        stopped
    }

    /// Wait for the last run's task to return.
    ///
    /// After [`stop`](Self::stop) this is when an in-flight removal has settled
    /// into the cancelled summary. Holds the run lock, so call it after `stop`
    /// or once the run has drained.
    pub async fn join(&self) {
        let mut run = self.run.lock().await;
        if let Some(active) = run.take()
            && let Err(e) = active.task.await
        {
            warn!(error = %e, "purge task ended abnormally");
        }
    }
}

impl Drop for PurgeScheduler {
    fn drop(&mut self) {
        if let Some(active) = self.run.get_mut() {
            active.cancel.cancel();
        }
        self.shared.cancel_display_timer();
    }
}

impl Shared {
    /// Apply `update` to the live progress unless the run was cancelled.
    fn publish(&self, cancel: &CancellationToken, update: impl FnOnce(&mut PurgeProgress)) {
        self.status.send_if_modified(|status| {
            if cancel.is_cancelled() || !status.is_purging() {
                return false;
            }
            match status.progress.as_mut() {
                Some(progress) => {
                    update(progress);
                    true
                }
                None => false,
            }
        });
    }

    /// Count a resolved dispatch against the run that issued it.
    ///
    /// Lands in the live progress while the run is still `Purging`, or in the
    /// run's cancelled summary if `stop` froze it while the removal was in
    /// flight.
    fn settle(
        &self,
        started_at: DateTime<Utc>,
        resolution: Resolution,
        update: impl FnOnce(&mut PurgeProgress),
    ) {
        self.status.send_if_modified(|status| {
            if status.is_purging() {
                return match status.progress.as_mut() {
                    Some(progress) if progress.started_at == started_at => {
                        resolution.count(
                            &mut progress.completed,
                            &mut progress.failed,
                            &mut progress.skipped,
                        );
                        update(progress);
                        true
                    }
                    _ => false,
                };
            }
            match status.last_summary.as_mut() {
                Some(summary) if summary.cancelled && summary.started_at == started_at => {
                    resolution.count(
                        &mut summary.completed,
                        &mut summary.failed,
                        &mut summary.skipped,
                    );
                    true
                }
                _ => false,
            }
        });
    }

    fn cancel_display_timer(&self) {
        let mut slot = self
            .display_timer
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = slot.take() {
            handle.cancel();
        }
    }

    /// Pop records that are no longer in the store; they cost no dispatch slot.
    fn skip_absent(&self, queue: &mut VecDeque<Pending>, cancel: &CancellationToken) {
        let mut skipped = 0;
        while queue
            .front()
            .is_some_and(|p| !self.store.contains(p.record.id()))
        {
            if let Some(pending) = queue.pop_front() {
                debug!(id = pending.record.id(), "record no longer in store, skipping");
            }
            skipped += 1;
        }
        if skipped > 0 {
            let remaining = queue.len();
            self.publish(cancel, |p| {
                p.completed += skipped;
                p.remaining = remaining;
            });
        }
    }

    /// Move a drained run to `Completed` and arm the return to `Idle`.
    fn finish(self: &Arc<Self>, cancel: &CancellationToken) {
        let finished_at = Utc::now();
        let mut summary = None;
        self.status.send_if_modified(|status| {
            if cancel.is_cancelled() || !status.is_purging() {
                return false;
            }
            let Some(progress) = status.progress.take() else {
                return false;
            };
            let done = PurgeSummary::from_progress(&progress, false, finished_at);
            summary = Some(done.clone());
            status.last_summary = Some(done);
            status.state = PurgeState::Completed;
            true
        });
        let Some(summary) = summary else {
            return;
        };

        info!(
            total = summary.total,
            removed = summary.removed(),
            skipped = summary.skipped,
            failed = summary.failed,
            "purge completed"
        );

        let weak: Weak<Self> = Arc::downgrade(self);
        let handle = timer::schedule(self.settings.display_window, move || {
            if let Some(shared) = weak.upgrade() {
                shared.status.send_if_modified(|status| {
                    if status.state != PurgeState::Completed {
                        return false;
                    }
                    status.state = PurgeState::Idle;
                    true
                });
            }
        });
        *self
            .display_timer
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(handle);
    }
}

async fn run_purge(
    shared: Arc<Shared>,
    queue: Vec<Record>,
    started_at: DateTime<Utc>,
    cancel: CancellationToken,
) {
    let mut queue: VecDeque<Pending> = queue
        .into_iter()
        .map(|record| Pending {
            record,
            attempts: 0,
        })
        .collect();

    let mut ticker = interval(shared.settings.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut countdown: Option<TimerHandle> = None;

    loop {
        shared.skip_absent(&mut queue, &cancel);
        if queue.is_empty() {
            break;
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("purge run cancelled between dispatches");
                return;
            }
            _ = ticker.tick() => {}
        }
        let next_due = Instant::now() + shared.settings.interval;

        let Some(mut pending) = queue.pop_front() else {
            break;
        };
        if let Some(previous) = countdown.take() {
            previous.cancel();
        }
        pending.attempts += 1;
        let id = pending.record.id().to_string();
        let category = pending.record.category();

        debug!(id = %id, attempt = pending.attempts, "dispatching removal");
        let resolution = match shared.remover.remove(&id).await {
            Ok(outcome) => {
                shared.store.remove(&id);
                match outcome {
                    RemovalOutcome::Removed => info!(id = %id, %category, "record removed"),
                    RemovalOutcome::AlreadyGone => {
                        info!(id = %id, %category, "record already gone remotely")
                    }
                }
                Resolution::Done
            }
            Err(e) if pending.attempts < shared.settings.max_attempts => {
                warn!(id = %id, attempt = pending.attempts, error = %e, "removal failed, requeued");
                queue.push_back(pending);
                Resolution::Requeued
            }
            Err(e) => {
                warn!(id = %id, attempt = pending.attempts, error = %e, "removal failed, skipping");
                Resolution::Skipped
            }
        };

        let remaining = queue.len();
        let next_in = if remaining > 0 {
            timer::whole_secs(next_due.saturating_duration_since(Instant::now()))
        } else {
            0
        };

        shared.settle(started_at, resolution, |p| {
            p.remaining = remaining;
            p.current_category = Some(category);
            p.seconds_to_next = next_in;
        });

        if cancel.is_cancelled() {
            debug!(id = %id, "purge run cancelled during removal");
            return;
        }

        if next_in > 0 {
            let tick_shared = Arc::clone(&shared);
            let tick_cancel = cancel.clone();
            countdown = Some(timer::countdown(cancel.child_token(), next_due, move |left| {
                tick_shared.publish(&tick_cancel, |p| p.seconds_to_next = left);
            }));
        }
    }

    if let Some(handle) = countdown {
        handle.cancel();
    }
    shared.finish(&cancel);
}
