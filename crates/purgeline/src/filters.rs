// SPDX-FileCopyrightText: 2026 Purgeline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Filter flags shared by every command, and archive loading.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use clap::Args;
use purgeline_archive::{load_archive, FilterConfig, PreviewMode, RecordStore};
use purgeline_config::model::{FilterDefaults, PreviewModeSetting};
use purgeline_config::PurgelineConfig;
use purgeline_core::{Category, PurgeError, Record};

#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Archive export (`tweets.js` or a JSON array). Defaults to `archive.path`.
    #[arg(long, short = 'a')]
    pub archive: Option<PathBuf>,

    /// First day to include (YYYY-MM-DD, UTC).
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Last day to include (YYYY-MM-DD, UTC); the whole day is covered.
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// Keyword to match, case-insensitive. Repeatable; replaces configured keywords.
    #[arg(long = "keyword", short = 'k')]
    pub keywords: Vec<String>,

    /// Category to include (post, reply, repost). Repeatable; replaces configured categories.
    #[arg(long = "category", short = 'c')]
    pub categories: Vec<Category>,

    /// Only show keyword matches.
    #[arg(long)]
    pub matches_only: bool,

    /// Keep only the first N records of the view.
    #[arg(long)]
    pub limit: Option<usize>,
}

impl FilterArgs {
    /// Combine flags with the configured defaults. Flags win when given.
    pub fn filter_config(&self, defaults: &FilterDefaults) -> FilterConfig {
        let keywords = if self.keywords.is_empty() {
            &defaults.keywords
        } else {
            &self.keywords
        };
        let categories = if self.categories.is_empty() {
            &defaults.categories
        } else {
            &self.categories
        };
        let preview_mode = match (self.matches_only, defaults.preview_mode) {
            (true, _) | (false, PreviewModeSetting::MatchesOnly) => PreviewMode::MatchesOnly,
            (false, PreviewModeSetting::ShowAll) => PreviewMode::ShowAll,
        };

        FilterConfig::new()
            .with_date_range(self.from, self.to)
            .with_keywords(keywords)
            .with_categories(categories.iter().copied())
            .with_preview_mode(preview_mode)
    }

    pub fn archive_path(&self, config: &PurgelineConfig) -> Result<PathBuf, PurgeError> {
        self.archive
            .clone()
            .or_else(|| config.archive.path.as_ref().map(PathBuf::from))
            .ok_or_else(|| {
                PurgeError::Config(
                    "no archive given. Pass --archive or set archive.path in config.".into(),
                )
            })
    }

    pub fn apply_limit(&self, mut view: Vec<Record>) -> Vec<Record> {
        if let Some(limit) = self.limit {
            view.truncate(limit);
        }
        view
    }
}

/// Load the archive named by the flags or config into a fresh store.
pub async fn load_store(
    args: &FilterArgs,
    config: &PurgelineConfig,
) -> Result<Arc<RecordStore>, PurgeError> {
    let path = args.archive_path(config)?;
    let records = load_archive(&path).await?;
    Ok(Arc::new(RecordStore::new(records)))
}
