// SPDX-FileCopyrightText: 2026 Purgeline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `purgeline list` command implementation.

use purgeline_config::PurgelineConfig;
use purgeline_core::PurgeError;
use tracing::info;

use crate::filters::{load_store, FilterArgs};
use crate::render;

/// Print the filtered view with keyword matches highlighted.
pub async fn run_list(
    config: &PurgelineConfig,
    args: &FilterArgs,
    use_color: bool,
) -> Result<(), PurgeError> {
    let store = load_store(args, config).await?;
    let filter = args.filter_config(&config.filter);
    let matched = store.filtered(&filter);
    let matched_count = matched.len();
    let view = args.apply_limit(matched);

    for record in &view {
        println!("{}", render::format_record(record, filter.keywords(), use_color));
    }

    println!();
    if view.len() < matched_count {
        println!(
            "  showing {} of {matched_count} matching records ({} in archive)",
            view.len(),
            store.len()
        );
    } else {
        println!("  {matched_count} of {} records match", store.len());
    }
    info!(matched = matched_count, total = store.len(), "list rendered");
    Ok(())
}
