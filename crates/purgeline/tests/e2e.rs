// SPDX-FileCopyrightText: 2026 Purgeline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests for the archive -> filter -> audit -> purge pipeline.
//!
//! Each test builds its own store from an inline export and talks to mock
//! collaborators only.

use std::sync::Arc;
use std::time::Duration;

use purgeline_archive::{highlight, parse_archive, FilterConfig, PreviewMode, RecordStore};
use purgeline_audit::AuditStore;
use purgeline_core::{Category, PurgeError, RiskLevel};
use purgeline_purge::{PurgeScheduler, PurgeState, SchedulerSettings};
use purgeline_test_utils::{MockAuditProvider, MockRemover};
use tokio::time::Instant;

const EXPORT: &str = r#"window.YTD.tweets.part0 = [
  {"tweet": {"id_str": "1", "full_text": "I hate Mondays", "created_at": "Mon Jan 06 09:00:00 +0000 2020", "favorite_count": "2", "retweet_count": "0"}},
  {"tweet": {"id_str": "2", "full_text": "@boss I HATE this plan", "created_at": "Tue Jan 07 10:00:00 +0000 2020", "in_reply_to_status_id_str": "77", "in_reply_to_screen_name": "boss"}},
  {"tweet": {"id_str": "3", "full_text": "RT @news: hate crimes are down", "created_at": "Wed Jan 08 11:00:00 +0000 2020"}},
  {"tweet": {"id_str": "4", "full_text": "what a lovely day", "created_at": "Thu Jan 09 12:00:00 +0000 2020"}},
  {"tweet": {"id_str": "5", "full_text": "hate it when that happens", "created_at": "Sat Mar 14 08:00:00 +0000 2021"}}
]"#;

fn store() -> Arc<RecordStore> {
    Arc::new(RecordStore::new(parse_archive(EXPORT).unwrap()))
}

fn ids(records: &[purgeline_core::Record]) -> Vec<&str> {
    records.iter().map(|r| r.id()).collect()
}

#[test]
fn export_categories_and_filter_view() {
    let store = store();
    let categories: Vec<Category> = store.snapshot().iter().map(|r| r.category()).collect();
    assert_eq!(
        categories,
        vec![Category::Post, Category::Reply, Category::Repost, Category::Post, Category::Post]
    );

    let filter = FilterConfig::new()
        .with_keywords(["hate"])
        .with_categories([Category::Post, Category::Reply])
        .with_date_range(None, chrono::NaiveDate::from_ymd_opt(2020, 12, 31))
        .with_preview_mode(PreviewMode::MatchesOnly);
    let view = store.filtered(&filter);
    assert_eq!(ids(&view), vec!["1", "2"]);

    let segments = highlight(view[1].text(), filter.keywords());
    let matched: Vec<&str> = segments
        .iter()
        .filter(|s| s.is_match)
        .map(|s| s.text.as_str())
        .collect();
    assert_eq!(matched, vec!["HATE"]);
}

#[tokio::test]
async fn audit_annotates_view_and_survives_provider_failure() {
    let store = store();
    let view = store.filtered(&FilterConfig::new().with_keywords(["hate"]));

    let provider = Arc::new(
        MockAuditProvider::new()
            .with_response(
                r#"[{"id":"1","reason":"mild","riskLevel":"Low","sentiment":"grumpy"},
                    {"id":"2","reason":"insults manager","riskLevel":"High","sentiment":"angry"},
                    {"id":"99","reason":"not asked","riskLevel":"High","sentiment":"x"},
                    {"reason":"no id","riskLevel":"Low","sentiment":"calm"}]"#,
            )
            .with_failure("upstream down"),
    );
    let audits = AuditStore::new(provider.clone(), 2);

    let results = audits.request_audit(&view).await.unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results["2"].risk_level, RiskLevel::High);
    assert!(!results.contains_key("99"));
    assert_eq!(provider.batches().await[0], vec!["1", "2"]);

    let err = audits.request_audit(&view).await.unwrap_err();
    assert!(matches!(err, PurgeError::AuditUnavailable { .. }));
    assert_eq!(audits.len(), 2, "earlier annotations survive a failed call");
}

#[tokio::test(start_paused = true)]
async fn purge_filtered_view_updates_store_and_view() {
    let store = store();
    let remover = Arc::new(MockRemover::new().with_gone(["3"]));
    let settings = SchedulerSettings {
        interval: Duration::from_secs(6),
        display_window: Duration::from_secs(5),
        max_attempts: 1,
    };
    let scheduler = PurgeScheduler::new(store.clone(), remover.clone(), settings);
    let mut rx = scheduler.subscribe();

    let filter = FilterConfig::new().with_keywords(["hate"]);
    let start = Instant::now();
    assert_eq!(scheduler.start_filtered(&filter).await.unwrap(), 4);

    let status = rx
        .wait_for(|s| s.state == PurgeState::Completed)
        .await
        .unwrap()
        .clone();
    let summary = status.last_summary.unwrap();
    assert_eq!(summary.total, 4);
    assert_eq!(summary.removed(), 4);

    let calls = remover.calls().await;
    assert_eq!(calls.len(), 4);
    assert_eq!(calls[0].at, start);
    assert!(calls[3].at - calls[0].at >= Duration::from_secs(18));

    assert!(store.filtered(&filter).is_empty());
    assert_eq!(ids(&store.snapshot()), vec!["4"]);

    rx.wait_for(|s| s.state == PurgeState::Idle).await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn cancelled_purge_leaves_undispatched_records() {
    let store = store();
    let remover = Arc::new(MockRemover::new());
    let scheduler = PurgeScheduler::new(store.clone(), remover.clone(), SchedulerSettings::default());
    let mut rx = scheduler.subscribe();

    scheduler.start(store.snapshot()).await.unwrap();
    rx.wait_for(|s| s.progress.as_ref().is_some_and(|p| p.completed == 1))
        .await
        .unwrap();
    assert!(scheduler.stop().await);

    tokio::time::sleep(Duration::from_secs(120)).await;
    assert_eq!(remover.calls().await.len(), 1);
    assert_eq!(store.len(), 4);
    assert!(!store.contains("1"));
}
