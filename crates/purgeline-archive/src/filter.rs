// SPDX-FileCopyrightText: 2026 Purgeline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Filter pipeline: pure predicate composition over the record store.
//!
//! [`apply`] narrows a slice of records to the ones that satisfy every clause
//! of a [`FilterConfig`]. It has no side effects and keeps the input order,
//! so it is safe to call after every configuration change or store removal.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use purgeline_core::{Category, Record};

use crate::highlight::fold_case;

/// Whether the view narrows to keyword matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PreviewMode {
    /// Keyword clause applies as configured.
    #[default]
    ShowAll,
    /// Only keyword matches pass. No effect while the keyword set is empty.
    MatchesOnly,
}

/// Value object describing the current selection.
///
/// Blank keywords are discarded on construction, so "no keywords" always
/// means "no keyword constraint".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterConfig {
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    keywords: Vec<String>,
    lowered: Vec<String>,
    categories: HashSet<Category>,
    preview_mode: PreviewMode,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            from: None,
            to: None,
            keywords: Vec::new(),
            lowered: Vec::new(),
            categories: Category::ALL.into_iter().collect(),
            preview_mode: PreviewMode::ShowAll,
        }
    }
}

impl FilterConfig {
    /// A filter that passes every record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to `[from, to]`, both inclusive calendar days (UTC). `None` leaves a side open.
    pub fn with_date_range(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    /// Replace the keyword set, keeping the given order for highlight tie-breaks.
    ///
    /// Keywords are trimmed; blanks and case-insensitive duplicates are dropped.
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.keywords.clear();
        self.lowered.clear();
        for keyword in keywords {
            let trimmed = keyword.as_ref().trim();
            if trimmed.is_empty() {
                continue;
            }
            let lowered = fold_case(trimmed);
            if !self.lowered.contains(&lowered) {
                self.keywords.push(trimmed.to_string());
                self.lowered.push(lowered);
            }
        }
        self
    }

    /// Replace the category set.
    pub fn with_categories<I>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = Category>,
    {
        self.categories = categories.into_iter().collect();
        self
    }

    pub fn with_preview_mode(mut self, preview_mode: PreviewMode) -> Self {
        self.preview_mode = preview_mode;
        self
    }

    pub fn from(&self) -> Option<NaiveDate> {
        self.from
    }

    pub fn to(&self) -> Option<NaiveDate> {
        self.to
    }

    /// Keywords in configured order.
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn categories(&self) -> &HashSet<Category> {
        &self.categories
    }

    pub fn preview_mode(&self) -> PreviewMode {
        self.preview_mode
    }

    /// Returns true if `record` passes every clause.
    pub fn matches(&self, record: &Record) -> bool {
        self.in_date_range(record.created_at())
            && self.categories.contains(&record.category())
            && self.keyword_clause(record.text())
            && self.preview_clause(record.text())
    }

    fn in_date_range(&self, at: DateTime<Utc>) -> bool {
        if let Some(from) = self.from
            && at < start_of_day(from)
        {
            return false;
        }
        // `to` covers its whole day: compare against the start of the next one.
        if let Some(next) = self.to.and_then(|to| to.succ_opt())
            && at >= start_of_day(next)
        {
            return false;
        }
        true
    }

    fn keyword_clause(&self, text: &str) -> bool {
        self.lowered.is_empty() || self.contains_keyword(text)
    }

    fn preview_clause(&self, text: &str) -> bool {
        match self.preview_mode {
            PreviewMode::ShowAll => true,
            PreviewMode::MatchesOnly => self.lowered.is_empty() || self.contains_keyword(text),
        }
    }

    fn contains_keyword(&self, text: &str) -> bool {
        let text = fold_case(text);
        self.lowered.iter().any(|k| text.contains(k.as_str()))
    }
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Produce the filtered view of `records`, preserving their order.
pub fn apply(records: &[Record], config: &FilterConfig) -> Vec<Record> {
    records
        .iter()
        .filter(|record| config.matches(record))
        .cloned()
        .collect()
}
