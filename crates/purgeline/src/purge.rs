// SPDX-FileCopyrightText: 2026 Purgeline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `purgeline purge` command implementation.
//!
//! Snapshots the filtered view, asks for confirmation, and runs the
//! scheduler against the remote service while rendering live progress.
//! Ctrl+C or SIGTERM stops the run; undispatched records are untouched.

use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use indicatif::ProgressBar;
use purgeline_config::PurgelineConfig;
use purgeline_core::{PurgeError, RemovalAdapter};
use purgeline_purge::{PurgeScheduler, PurgeStatus, PurgeSummary, SchedulerSettings};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::filters::{load_store, FilterArgs};
use crate::remote::HttpRemover;
use crate::{render, shutdown};

#[derive(Args, Debug, Clone)]
pub struct PurgeArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Skip the confirmation prompt.
    #[arg(long, short = 'y')]
    pub yes: bool,
}

pub async fn run_purge(
    config: &PurgelineConfig,
    args: &PurgeArgs,
    use_color: bool,
) -> Result<(), PurgeError> {
    let store = load_store(&args.filter, config).await?;
    let filter = args.filter.filter_config(&config.filter);
    let queue = args.filter.apply_limit(store.filtered(&filter));
    if queue.is_empty() {
        println!("nothing matches the filter; nothing to purge");
        return Ok(());
    }

    let settings = SchedulerSettings::from(&config.purge);
    println!(
        "{} of {} records selected. One removal every {}, about {} in total.",
        queue.len(),
        store.len(),
        format_duration(settings.interval),
        format_duration(estimated_duration(queue.len(), settings.interval)),
    );
    if !args.yes && !confirm("Delete them from the remote service? [y/N] ")? {
        println!("aborted");
        return Ok(());
    }

    let remover: Arc<dyn RemovalAdapter> = Arc::new(HttpRemover::new(&config.remote)?);
    let scheduler = PurgeScheduler::new(store, remover, settings);
    let shutdown = shutdown::install_signal_handler();
    let mut rx = scheduler.subscribe();

    let total = queue.len();
    scheduler.start(queue).await?;
    let bar = render::progress_bar(total);
    let summary = follow_run(&scheduler, &mut rx, &shutdown, &bar).await;

    match summary {
        Some(summary) => {
            info!(
                removed = summary.removed(),
                skipped = summary.skipped,
                cancelled = summary.cancelled,
                "purge finished"
            );
            println!("{}", render::format_summary(&summary, use_color));
        }
        None => warn!("purge ended without a summary"),
    }
    Ok(())
}

/// Mirror status snapshots onto the progress bar until the run leaves `Purging`.
async fn follow_run(
    scheduler: &PurgeScheduler,
    rx: &mut watch::Receiver<PurgeStatus>,
    shutdown: &CancellationToken,
    bar: &ProgressBar,
) -> Option<PurgeSummary> {
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                scheduler.stop().await;
                bar.abandon_with_message("stopped");
                scheduler.join().await;
                break;
            }
            changed = rx.changed() => {
                if changed.is_err() {
                    bar.abandon();
                    break;
                }
                let status = rx.borrow_and_update().clone();
                match status.progress {
                    Some(progress) if status.is_purging() => render::update_progress(bar, &progress),
                    _ => {
                        bar.finish_and_clear();
                        break;
                    }
                }
            }
        }
    }
    scheduler.status().last_summary
}

fn confirm(prompt: &str) -> Result<bool, PurgeError> {
    print!("{prompt}");
    io::stdout()
        .flush()
        .map_err(|e| PurgeError::Internal(format!("cannot write prompt: {e}")))?;
    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .map_err(|e| PurgeError::Internal(format!("cannot read answer: {e}")))?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Wall time for `count` dispatches: the first is immediate.
fn estimated_duration(count: usize, interval: Duration) -> Duration {
    interval * u32::try_from(count.saturating_sub(1)).unwrap_or(u32::MAX)
}

fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let (hours, minutes, seconds) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if hours > 0 {
        format!("{hours}h {minutes}m")
    } else if minutes > 0 {
        format!("{minutes}m {seconds}s")
    } else if duration.subsec_millis() > 0 && secs < 10 {
        format!("{:.1}s", duration.as_secs_f64())
    } else {
        format!("{seconds}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yes_answers() {
        assert!(is_yes("y\n"));
        assert!(is_yes(" YES "));
        assert!(!is_yes(""));
        assert!(!is_yes("no"));
        assert!(!is_yes("yep"));
    }

    #[test]
    fn estimate_counts_intervals_between_dispatches() {
        let interval = Duration::from_secs(6);
        assert_eq!(estimated_duration(0, interval), Duration::ZERO);
        assert_eq!(estimated_duration(1, interval), Duration::ZERO);
        assert_eq!(estimated_duration(3, interval), Duration::from_secs(12));
    }

    #[test]
    fn durations_are_human_readable() {
        assert_eq!(format_duration(Duration::from_secs(6)), "6s");
        assert_eq!(format_duration(Duration::from_millis(6500)), "6.5s");
        assert_eq!(format_duration(Duration::from_secs(594)), "9m 54s");
        assert_eq!(format_duration(Duration::from_secs(7260)), "2h 1m");
    }
}
