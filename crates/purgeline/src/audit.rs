// SPDX-FileCopyrightText: 2026 Purgeline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `purgeline audit` command implementation.
//!
//! Sends the first `audit.batch_cap` records of the filtered view to the
//! classifier and prints them with their annotations. An unavailable
//! classifier is reported but does not fail the command.

use std::collections::BTreeMap;
use std::sync::Arc;

use clap::Args;
use purgeline_anthropic::AnthropicAuditProvider;
use purgeline_audit::{AuditMap, AuditStore};
use purgeline_config::PurgelineConfig;
use purgeline_core::{AuditProvider, PurgeError, Record, RiskLevel};
use tracing::warn;

use crate::filters::{load_store, FilterArgs};
use crate::render;

#[derive(Args, Debug, Clone)]
pub struct AuditArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Only print records rated at least this level (Low, Medium, High).
    #[arg(long)]
    pub min_risk: Option<RiskLevel>,
}

pub async fn run_audit(
    config: &PurgelineConfig,
    args: &AuditArgs,
    use_color: bool,
) -> Result<(), PurgeError> {
    let store = load_store(&args.filter, config).await?;
    let filter = args.filter.filter_config(&config.filter);
    let view = args.filter.apply_limit(store.filtered(&filter));
    if view.is_empty() {
        println!("nothing matches the filter");
        return Ok(());
    }

    let provider: Arc<dyn AuditProvider> = Arc::new(AnthropicAuditProvider::new(config)?);
    let audits = AuditStore::new(provider, config.audit.batch_cap);
    let results = match audits.request_audit(&view).await {
        Ok(results) => results,
        Err(e @ PurgeError::AuditUnavailable { .. }) => {
            warn!(error = %e, "audit failed");
            eprintln!("purgeline: {e}; records are shown without annotations");
            AuditMap::new()
        }
        Err(e) => return Err(e),
    };

    let sent = view.len().min(config.audit.batch_cap);
    for record in &view[..sent] {
        let annotation = results.get(record.id());
        if !passes_min_risk(annotation.map(|a| a.risk_level), args.min_risk) {
            continue;
        }
        println!("{}", render::format_record(record, filter.keywords(), use_color));
        if let Some(result) = annotation {
            println!("{}", render::format_annotation(result, use_color));
        }
    }

    println!();
    println!("  {}", tally_line(&view[..sent], &results));
    if view.len() > sent {
        println!(
            "  {} more records were not sent (audit.batch_cap = {})",
            view.len() - sent,
            config.audit.batch_cap
        );
    }
    Ok(())
}

fn passes_min_risk(level: Option<RiskLevel>, min: Option<RiskLevel>) -> bool {
    match (min, level) {
        (None, _) => true,
        (Some(min), Some(level)) => level >= min,
        (Some(_), None) => false,
    }
}

fn tally_line(sent: &[Record], results: &AuditMap) -> String {
    let mut counts: BTreeMap<RiskLevel, usize> = BTreeMap::new();
    for record in sent {
        if let Some(result) = results.get(record.id()) {
            *counts.entry(result.risk_level).or_default() += 1;
        }
    }
    let annotated: usize = counts.values().sum();
    let levels: Vec<String> = counts
        .iter()
        .rev()
        .map(|(level, count)| format!("{count} {level}"))
        .collect();
    if levels.is_empty() {
        format!("0 of {} records annotated", sent.len())
    } else {
        format!(
            "{annotated} of {} records annotated: {}",
            sent.len(),
            levels.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use purgeline_core::AuditResult;
    use purgeline_test_utils::fixtures::posts;

    fn result(level: RiskLevel) -> AuditResult {
        AuditResult {
            reason: "r".into(),
            risk_level: level,
            sentiment: "s".into(),
        }
    }

    #[test]
    fn min_risk_is_inclusive_and_drops_unannotated() {
        assert!(passes_min_risk(None, None));
        assert!(passes_min_risk(Some(RiskLevel::Medium), Some(RiskLevel::Medium)));
        assert!(passes_min_risk(Some(RiskLevel::High), Some(RiskLevel::Medium)));
        assert!(!passes_min_risk(Some(RiskLevel::Low), Some(RiskLevel::Medium)));
        assert!(!passes_min_risk(None, Some(RiskLevel::Low)));
    }

    #[test]
    fn tally_counts_levels_highest_first() {
        let sent = posts(4);
        let mut results = AuditMap::new();
        results.insert("1".into(), result(RiskLevel::Low));
        results.insert("2".into(), result(RiskLevel::High));
        results.insert("3".into(), result(RiskLevel::High));
        results.insert("orphan".into(), result(RiskLevel::Medium));
        assert_eq!(
            tally_line(&sent, &results),
            "3 of 4 records annotated: 2 High, 1 Low"
        );
    }

    #[test]
    fn tally_without_results() {
        assert_eq!(tally_line(&posts(2), &AuditMap::new()), "0 of 2 records annotated");
    }
}
