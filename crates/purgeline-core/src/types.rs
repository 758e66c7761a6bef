// SPDX-FileCopyrightText: 2026 Purgeline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Record model and common types shared across the Purgeline workspace.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Prefix that marks a repost in archive exports.
const REPOST_PREFIX: &str = "RT @";

/// The closed set of archived item kinds.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// An original post.
    Post,
    /// A reply to another item.
    Reply,
    /// A repost of someone else's item.
    Repost,
}

impl Category {
    /// All categories, in display order.
    pub const ALL: [Category; 3] = [Category::Post, Category::Reply, Category::Repost];

    /// Classify an item from its body and parent reference.
    ///
    /// A non-empty parent status id always wins over the repost prefix.
    pub fn classify(text: &str, reply_to: Option<&ReplyTarget>) -> Self {
        if reply_to.is_some_and(|r| !r.status_id.trim().is_empty()) {
            Category::Reply
        } else if text.starts_with(REPOST_PREFIX) {
            Category::Repost
        } else {
            Category::Post
        }
    }
}

/// Parent reference carried by replies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyTarget {
    /// Identifier of the item being replied to.
    pub status_id: String,
    /// Identifier of the parent author, when the export includes it.
    pub user_id: Option<String>,
    /// Handle of the parent author, when the export includes it.
    pub screen_name: Option<String>,
}

/// Untyped input for building a [`Record`].
///
/// The category is not part of the draft: it is derived exactly once by
/// [`Record::new`].
#[derive(Debug, Clone)]
pub struct RecordDraft {
    pub id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub reply_to: Option<ReplyTarget>,
    pub like_count: u64,
    pub repost_count: u64,
}

/// An immutable snapshot of one archived item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    id: String,
    text: String,
    created_at: DateTime<Utc>,
    category: Category,
    reply_to: Option<ReplyTarget>,
    like_count: u64,
    repost_count: u64,
}

impl Record {
    /// Build a record, deriving its category from the draft.
    ///
    /// Parent references are kept only for replies; an empty parent id is
    /// dropped so that `reply_to` is set iff the category is [`Category::Reply`].
    pub fn new(draft: RecordDraft) -> Self {
        let category = Category::classify(&draft.text, draft.reply_to.as_ref());
        let reply_to = match category {
            Category::Reply => draft.reply_to,
            _ => None,
        };
        Self {
            id: draft.id,
            text: draft.text,
            created_at: draft.created_at,
            category,
            reply_to,
            like_count: draft.like_count,
            repost_count: draft.repost_count,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn reply_to(&self) -> Option<&ReplyTarget> {
        self.reply_to.as_ref()
    }

    pub fn like_count(&self) -> u64 {
        self.like_count
    }

    pub fn repost_count(&self) -> u64 {
        self.repost_count
    }
}

/// Risk level assigned by the audit collaborator.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, Serialize,
    Deserialize,
)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// A content-risk classification attached to a record by identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditResult {
    /// Free-text explanation from the classifier.
    pub reason: String,
    /// Classified risk level.
    pub risk_level: RiskLevel,
    /// Free-text sentiment label.
    pub sentiment: String,
}

/// Outcome of a successful remote removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalOutcome {
    /// The remote service deleted the item.
    Removed,
    /// The remote service no longer had the item; treated as satisfied.
    AlreadyGone,
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the role an adapter plays.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Removal,
    Audit,
}
