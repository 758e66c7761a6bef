// SPDX-FileCopyrightText: 2026 Purgeline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Record builders for tests.

use chrono::{DateTime, TimeZone, Utc};
use purgeline_core::{Record, RecordDraft, ReplyTarget};

/// Fixed timestamp used when the test does not care about dates.
pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, 1, 1, 12, 0, 0)
        .single()
        .unwrap_or_default()
}

/// A record with an explicit timestamp and optional parent id.
pub fn record_at(id: &str, text: &str, at: DateTime<Utc>, parent: Option<&str>) -> Record {
    Record::new(RecordDraft {
        id: id.to_string(),
        text: text.to_string(),
        created_at: at,
        reply_to: parent.map(|p| ReplyTarget {
            status_id: p.to_string(),
            user_id: None,
            screen_name: None,
        }),
        like_count: 0,
        repost_count: 0,
    })
}

pub fn post(id: &str, text: &str) -> Record {
    record_at(id, text, epoch(), None)
}

pub fn reply(id: &str, text: &str, parent: &str) -> Record {
    record_at(id, text, epoch(), Some(parent))
}

pub fn repost(id: &str, text: &str) -> Record {
    record_at(id, &format!("RT @someone: {text}"), epoch(), None)
}

/// `count` posts with ids `"1"..="count"`.
pub fn posts(count: usize) -> Vec<Record> {
    (1..=count)
        .map(|i| post(&i.to_string(), &format!("post number {i}")))
        .collect()
}
