// SPDX-FileCopyrightText: 2026 Purgeline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Terminal rendering: highlighted records, audit annotations, purge progress.

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use purgeline_archive::{highlight, Segment};
use purgeline_core::{AuditResult, Record, RiskLevel};
use purgeline_purge::{PurgeProgress, PurgeSummary};

/// Join segments into one line, emphasizing matches when color is on.
pub fn render_segments(segments: &[Segment], use_color: bool) -> String {
    segments
        .iter()
        .map(|segment| {
            let text = single_line(&segment.text);
            if segment.is_match && use_color {
                text.black().on_yellow().bold().to_string()
            } else {
                text
            }
        })
        .collect()
}

fn single_line(text: &str) -> String {
    text.replace(['\n', '\r'], " ")
}

/// One record per line: date, category, id, highlighted body.
pub fn format_record(record: &Record, keywords: &[String], use_color: bool) -> String {
    let date = record.created_at().format("%Y-%m-%d");
    let category = format!("{:<6}", record.category().to_string());
    let body = render_segments(&highlight(record.text(), keywords), use_color);
    if use_color {
        format!("{} {} {}  {body}", date.to_string().dimmed(), category.cyan(), record.id().dimmed())
    } else {
        format!("{date} {category} {}  {body}", record.id())
    }
}

/// Indented annotation line shown under an audited record.
pub fn format_annotation(result: &AuditResult, use_color: bool) -> String {
    let level = format!("{:<6}", result.risk_level.to_string());
    let level = if use_color {
        match result.risk_level {
            RiskLevel::High => level.red().bold().to_string(),
            RiskLevel::Medium => level.yellow().to_string(),
            RiskLevel::Low => level.green().to_string(),
        }
    } else {
        level
    };
    format!(
        "    risk {level} sentiment: {}  {}",
        single_line(&result.sentiment),
        single_line(&result.reason)
    )
}

pub fn progress_bar(total: usize) -> ProgressBar {
    let bar = ProgressBar::new(total as u64);
    if let Ok(style) = ProgressStyle::with_template(
        "{spinner} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}",
    ) {
        bar.set_style(style.progress_chars("=> "));
    }
    bar
}

pub fn update_progress(bar: &ProgressBar, progress: &PurgeProgress) {
    bar.set_length(progress.total as u64);
    bar.set_position(progress.completed as u64);
    bar.set_message(progress_message(progress));
}

fn progress_message(progress: &PurgeProgress) -> String {
    let mut message = match progress.current_category {
        Some(category) => format!("last: {category}"),
        None => "starting".to_string(),
    };
    if progress.remaining > 0 {
        message.push_str(&format!(", next in {}s", progress.seconds_to_next));
    }
    if progress.failed > 0 {
        message.push_str(&format!(", {} failed", progress.failed));
    }
    message
}

pub fn format_summary(summary: &PurgeSummary, use_color: bool) -> String {
    let elapsed = (summary.finished_at - summary.started_at).num_seconds().max(0);
    let headline = if summary.cancelled {
        "purge cancelled"
    } else {
        "purge completed"
    };
    let headline = if use_color {
        if summary.cancelled {
            headline.yellow().bold().to_string()
        } else {
            headline.green().bold().to_string()
        }
    } else {
        headline.to_string()
    };

    let mut line = format!(
        "{headline}: {} of {} removed in {elapsed}s",
        summary.removed(),
        summary.total
    );
    if summary.skipped > 0 {
        line.push_str(&format!(", {} skipped after failures", summary.skipped));
    }
    if summary.cancelled {
        let left = summary.total - summary.completed;
        line.push_str(&format!(", {left} left untouched"));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use purgeline_core::Category;
    use purgeline_test_utils::fixtures::post;

    #[test]
    fn plain_rendering_keeps_text_verbatim() {
        let segments = highlight("I hate Mondays", &["hate"]);
        assert_eq!(render_segments(&segments, false), "I hate Mondays");
    }

    #[test]
    fn colored_rendering_keeps_every_character() {
        let segments = highlight("I hate Mondays", &["hate"]);
        let rendered = render_segments(&segments, true);
        assert!(rendered.contains("hate"));
        assert!(rendered.starts_with("I "));
        assert!(rendered.ends_with(" Mondays"));
    }

    #[test]
    fn record_line_is_single_line() {
        let record = post("42", "line one\nline two");
        let line = format_record(&record, &[], false);
        assert!(line.contains("post"));
        assert!(line.contains("42"));
        assert!(line.ends_with("line one line two"));
        assert!(!line.contains('\n'));
    }

    #[test]
    fn annotation_names_level_and_reason() {
        let result = AuditResult {
            reason: "insults a coworker".into(),
            risk_level: RiskLevel::High,
            sentiment: "hostile".into(),
        };
        let line = format_annotation(&result, false);
        assert!(line.contains("High"));
        assert!(line.contains("hostile"));
        assert!(line.contains("insults a coworker"));
    }

    #[test]
    fn progress_message_mentions_countdown_and_failures() {
        let mut progress = PurgeProgress::new(3, Utc::now());
        assert_eq!(progress_message(&progress), "starting, next in 0s");

        progress.completed = 1;
        progress.remaining = 2;
        progress.failed = 1;
        progress.seconds_to_next = 4;
        progress.current_category = Some(Category::Reply);
        assert_eq!(progress_message(&progress), "last: reply, next in 4s, 1 failed");
    }

    #[test]
    fn summary_for_cancelled_run_reports_leftovers() {
        let started_at = Utc::now();
        let summary = PurgeSummary {
            total: 10,
            completed: 4,
            failed: 1,
            skipped: 1,
            cancelled: true,
            started_at,
            finished_at: started_at + Duration::seconds(24),
        };
        assert_eq!(
            format_summary(&summary, false),
            "purge cancelled: 3 of 10 removed in 24s, 1 skipped after failures, 6 left untouched"
        );
    }
}
