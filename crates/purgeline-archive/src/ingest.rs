// SPDX-FileCopyrightText: 2026 Purgeline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Archive export ingestion.
//!
//! Accepts the `tweets.js` shape of a personal archive
//! (`window.YTD.tweets.part0 = [ {"tweet": {...}}, ... ]`) as well as a bare
//! JSON array of either wrapped or unwrapped items. Individual items that do
//! not parse are dropped with a warning; only an unreadable document fails.

use std::path::Path;

use chrono::{DateTime, Utc};
use purgeline_core::{PurgeError, Record, RecordDraft, ReplyTarget};
use serde::{Deserialize, Deserializer};
use tracing::{debug, info, warn};

/// Timestamp layout used by archive exports, e.g. `Wed Oct 10 20:19:24 +0000 2018`.
const ARCHIVE_TIME_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ArchiveEntry {
    Wrapped { tweet: RawItem },
    Bare(RawItem),
}

#[derive(Debug, Deserialize)]
struct RawItem {
    #[serde(alias = "id")]
    id_str: String,
    #[serde(alias = "text")]
    full_text: String,
    created_at: String,
    #[serde(default)]
    in_reply_to_status_id_str: Option<String>,
    #[serde(default)]
    in_reply_to_user_id_str: Option<String>,
    #[serde(default)]
    in_reply_to_screen_name: Option<String>,
    #[serde(default, deserialize_with = "count")]
    favorite_count: u64,
    #[serde(default, deserialize_with = "count")]
    retweet_count: u64,
}

/// Engagement counters arrive as strings in exports and as numbers elsewhere.
fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Count {
        Number(u64),
        Text(String),
    }

    Ok(match Count::deserialize(deserializer)? {
        Count::Number(n) => n,
        Count::Text(s) => s.trim().parse().unwrap_or(0),
    })
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_str(raw, ARCHIVE_TIME_FORMAT)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

impl RawItem {
    fn into_record(self) -> Option<Record> {
        let Some(created_at) = parse_timestamp(&self.created_at) else {
            warn!(id = %self.id_str, created_at = %self.created_at, "skipping item with unparsable timestamp");
            return None;
        };
        if self.id_str.trim().is_empty() {
            warn!("skipping item with empty id");
            return None;
        }

        let reply_to = self
            .in_reply_to_status_id_str
            .filter(|id| !id.trim().is_empty())
            .map(|status_id| ReplyTarget {
                status_id,
                user_id: self.in_reply_to_user_id_str,
                screen_name: self.in_reply_to_screen_name,
            });

        Some(Record::new(RecordDraft {
            id: self.id_str,
            text: self.full_text,
            created_at,
            reply_to,
            like_count: self.favorite_count,
            repost_count: self.retweet_count,
        }))
    }
}

/// Strip the `window.YTD.<name>.partN = ` assignment, if present.
fn json_payload(content: &str) -> &str {
    let trimmed = content.trim_start_matches('\u{feff}').trim();
    if trimmed.starts_with('[') {
        return trimmed;
    }
    match trimmed.find('=') {
        Some(eq) => trimmed[eq + 1..].trim().trim_end_matches(';'),
        None => trimmed,
    }
}

/// Parse an archive document into records, in document order.
pub fn parse_archive(content: &str) -> Result<Vec<Record>, PurgeError> {
    let payload = json_payload(content);
    if payload.is_empty() {
        return Ok(Vec::new());
    }

    let items: Vec<serde_json::Value> =
        serde_json::from_str(payload).map_err(|e| PurgeError::Archive {
            message: format!("archive is not a JSON array: {e}"),
            source: Some(Box::new(e)),
        })?;

    let total = items.len();
    let records: Vec<Record> = items
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value::<ArchiveEntry>(value) {
            Ok(ArchiveEntry::Wrapped { tweet } | ArchiveEntry::Bare(tweet)) => tweet.into_record(),
            Err(e) => {
                warn!(index, error = %e, "skipping malformed archive item");
                None
            }
        })
        .collect();

    debug!(total, kept = records.len(), "archive parsed");
    Ok(records)
}

/// Read and parse an archive file.
pub async fn load_archive(path: &Path) -> Result<Vec<Record>, PurgeError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| PurgeError::Archive {
            message: format!("cannot read {}: {e}", path.display()),
            source: Some(Box::new(e)),
        })?;
    let records = parse_archive(&content)?;
    info!(path = %path.display(), count = records.len(), "archive loaded");
    Ok(records)
}
