// SPDX-FileCopyrightText: 2026 Purgeline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Signal handling for interactive runs.
//!
//! Installs handlers for SIGTERM and SIGINT (Ctrl+C), triggering a
//! [`CancellationToken`] that the purge command watches to stop the
//! scheduler.

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Installs signal handlers for SIGTERM and SIGINT.
///
/// Returns a [`CancellationToken`] that is cancelled when either signal is received.
pub fn install_signal_handler() -> CancellationToken {
    let token = CancellationToken::new();
    let token_clone = token.clone();

    tokio::spawn(async move {
        wait_for_signal().await;
        token_clone.cancel();
        debug!("shutdown signal handler completed");
    });

    token
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let ctrl_c = tokio::signal::ctrl_c();
    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            tokio::select! {
                _ = ctrl_c => info!("received SIGINT (Ctrl+C), stopping purge"),
                _ = sigterm.recv() => info!("received SIGTERM, stopping purge"),
            }
        }
        Err(e) => {
            warn!(error = %e, "cannot install SIGTERM handler, listening for Ctrl+C only");
            ctrl_c_or_never(ctrl_c.await).await;
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    ctrl_c_or_never(tokio::signal::ctrl_c().await).await;
}

/// A failed Ctrl+C listener must not read as a signal.
async fn ctrl_c_or_never(result: std::io::Result<()>) {
    match result {
        Ok(()) => info!("received Ctrl+C, stopping purge"),
        Err(e) => {
            warn!(error = %e, "cannot listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    }
}
