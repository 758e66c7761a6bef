// SPDX-FileCopyrightText: 2026 Purgeline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for Purgeline.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::time::Duration;

use purgeline_core::Category;
use serde::{Deserialize, Serialize};

/// Top-level Purgeline configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PurgelineConfig {
    /// Process-wide settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Archive export location.
    #[serde(default)]
    pub archive: ArchiveConfig,

    /// Default filter applied when the CLI does not override it.
    #[serde(default)]
    pub filter: FilterDefaults,

    /// Purge scheduler pacing and retry policy.
    #[serde(default)]
    pub purge: PurgeConfig,

    /// Audit batch settings.
    #[serde(default)]
    pub audit: AuditConfig,

    /// Anthropic API settings used by the audit provider.
    #[serde(default)]
    pub anthropic: AnthropicConfig,

    /// Remote service the purge deletes from.
    #[serde(default)]
    pub remote: RemoteConfig,
}

/// Process-wide settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GeneralConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Archive export location.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ArchiveConfig {
    /// Path to the export file (`tweets.js` or a JSON array). Can be overridden per command.
    #[serde(default)]
    pub path: Option<String>,
}

/// Preview mode stored in config; mirrors the filter pipeline's enum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PreviewModeSetting {
    #[default]
    ShowAll,
    MatchesOnly,
}

/// Default filter settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FilterDefaults {
    /// Keywords matched case-insensitively against item bodies.
    #[serde(default)]
    pub keywords: Vec<String>,

    /// Categories included in the view.
    #[serde(default = "default_categories")]
    pub categories: Vec<Category>,

    /// Whether the view narrows to keyword matches.
    #[serde(default)]
    pub preview_mode: PreviewModeSetting,
}

impl Default for FilterDefaults {
    fn default() -> Self {
        Self {
            keywords: Vec::new(),
            categories: default_categories(),
            preview_mode: PreviewModeSetting::default(),
        }
    }
}

fn default_categories() -> Vec<Category> {
    Category::ALL.to_vec()
}

/// Purge scheduler pacing and retry policy.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PurgeConfig {
    /// External cap on removals per minute. The dispatch interval is `60 / limit` seconds,
    /// rounded up to the millisecond.
    #[serde(default = "default_rate_limit_per_minute")]
    pub rate_limit_per_minute: u32,

    /// How long a finished run stays in the completed state before reverting to idle.
    #[serde(default = "default_completion_display_secs")]
    pub completion_display_secs: u64,

    /// Attempts per item before a failed removal is skipped. `1` means never retry.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl PurgeConfig {
    /// Minimum time between the start of two consecutive dispatches.
    ///
    /// Rounded up to whole milliseconds, the tokio timer's resolution, so that
    /// `limit` intervals always span at least a full minute.
    pub fn dispatch_interval(&self) -> Duration {
        let limit = u64::from(self.rate_limit_per_minute.max(1));
        Duration::from_millis(60_000u64.div_ceil(limit))
    }

    /// Completed-state display window.
    pub fn completion_display(&self) -> Duration {
        Duration::from_secs(self.completion_display_secs)
    }
}

impl Default for PurgeConfig {
    fn default() -> Self {
        Self {
            rate_limit_per_minute: default_rate_limit_per_minute(),
            completion_display_secs: default_completion_display_secs(),
            max_attempts: default_max_attempts(),
        }
    }
}

fn default_rate_limit_per_minute() -> u32 {
    10
}

fn default_completion_display_secs() -> u64 {
    5
}

fn default_max_attempts() -> u32 {
    1
}

/// Audit batch settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Maximum number of records sent to the classifier in one call.
    #[serde(default = "default_batch_cap")]
    pub batch_cap: usize,

    /// Model used for classification.
    #[serde(default = "default_audit_model")]
    pub model: String,

    /// Maximum tokens the classifier may generate.
    #[serde(default = "default_audit_max_tokens")]
    pub max_tokens: u32,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            batch_cap: default_batch_cap(),
            model: default_audit_model(),
            max_tokens: default_audit_max_tokens(),
        }
    }
}

fn default_batch_cap() -> usize {
    50
}

fn default_audit_model() -> String {
    "claude-haiku-4-5-20251001".to_string()
}

fn default_audit_max_tokens() -> u32 {
    4096
}

/// Anthropic API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AnthropicConfig {
    /// Anthropic API key. `None` falls back to `ANTHROPIC_API_KEY`.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Anthropic API version string.
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Override for the Messages API endpoint.
    #[serde(default)]
    pub base_url: Option<String>,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_version: default_api_version(),
            base_url: None,
        }
    }
}

fn default_api_version() -> String {
    "2023-06-01".to_string()
}

/// Remote service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RemoteConfig {
    /// Base URL of the delete endpoint; the item id is appended as the last path segment.
    #[serde(default = "default_remote_base_url")]
    pub base_url: String,

    /// Bearer token sent with each removal.
    #[serde(default)]
    pub bearer_token: Option<String>,

    /// Per-request timeout in seconds.
    #[serde(default = "default_remote_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: default_remote_base_url(),
            bearer_token: None,
            timeout_secs: default_remote_timeout_secs(),
        }
    }
}

fn default_remote_base_url() -> String {
    "https://api.twitter.com/2/tweets".to_string()
}

fn default_remote_timeout_secs() -> u64 {
    30
}
