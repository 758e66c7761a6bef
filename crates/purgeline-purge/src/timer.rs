// SPDX-FileCopyrightText: 2026 Purgeline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cancelable one-shot and countdown timers on the tokio clock.
//!
//! Both kinds run on a spawned task and stop as soon as their
//! [`TimerHandle`] is cancelled. Cancellation is idempotent and safe after
//! the timer has fired.

use std::time::Duration;

use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;

/// Handle to a scheduled timer.
///
/// Dropping the handle does not cancel the timer.
#[derive(Debug, Clone)]
pub struct TimerHandle {
    token: CancellationToken,
}

impl TimerHandle {
    /// Stop the timer. A no-op if it already fired or was cancelled.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Run `task` once after `delay` unless cancelled first.
pub fn schedule<F>(delay: Duration, task: F) -> TimerHandle
where
    F: FnOnce() + Send + 'static,
{
    schedule_with_token(CancellationToken::new(), delay, task)
}

/// Like [`schedule`], but cancelled by `token` (typically a child of a run token).
pub fn schedule_with_token<F>(token: CancellationToken, delay: Duration, task: F) -> TimerHandle
where
    F: FnOnce() + Send + 'static,
{
    let guard = token.clone();
    tokio::spawn(async move {
        tokio::select! {
            biased;
            _ = guard.cancelled() => {}
            _ = tokio::time::sleep(delay) => task(),
        }
    });
    TimerHandle { token }
}

/// Whole seconds in `duration`, rounded up.
pub(crate) fn whole_secs(duration: Duration) -> u64 {
    duration.as_secs() + u64::from(duration.subsec_nanos() > 0)
}

/// Count down to `deadline`, calling `on_tick` with the whole seconds left.
///
/// Ticks land on whole seconds before the deadline, so the last call, with
/// `0`, happens at `deadline` itself. The timer finishes on its own after it.
pub fn countdown<F>(token: CancellationToken, deadline: Instant, mut on_tick: F) -> TimerHandle
where
    F: FnMut(u64) + Send + 'static,
{
    let guard = token.clone();
    tokio::spawn(async move {
        let mut left = whole_secs(deadline.saturating_duration_since(Instant::now()));
        while left > 0 {
            left -= 1;
            let at = deadline - Duration::from_secs(left);
            tokio::select! {
                biased;
                _ = guard.cancelled() => return,
                _ = sleep_until(at) => on_tick(left),
            }
        }
    });
    TimerHandle { token }
}
