// SPDX-FileCopyrightText: 2026 Purgeline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Figment-to-miette error bridge with fuzzy match suggestions.
//!
//! Converts Figment deserialization errors into miette diagnostics with
//! source spans, valid key listings, and "did you mean?" suggestions.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Minimum Jaro-Winkler similarity score to suggest a correction.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// A configuration error with rich diagnostic information.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// An unknown key was found in the configuration.
    #[error("unknown configuration key `{key}`")]
    #[diagnostic(
        code(purgeline::config::unknown_key),
        help("{}", format_unknown_key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        /// The unrecognized key name.
        key: String,
        /// Suggested correction via fuzzy matching, if any.
        suggestion: Option<String>,
        /// List of valid keys for the section.
        valid_keys: String,
        /// Source span for the offending key.
        #[label("this key is not recognized")]
        span: Option<SourceSpan>,
        /// The source file content for context display.
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A configuration value has the wrong type.
    #[error("invalid type for key `{key}`: {detail}")]
    #[diagnostic(code(purgeline::config::invalid_type), help("expected {expected}"))]
    InvalidType {
        key: String,
        detail: String,
        expected: String,
    },

    /// A value is not one of the accepted variants (e.g. an unknown category).
    #[error("invalid value for key `{key}`: {detail}")]
    #[diagnostic(code(purgeline::config::invalid_value))]
    InvalidValue { key: String, detail: String },

    /// A required configuration key is missing.
    #[error("missing required key `{key}`")]
    #[diagnostic(
        code(purgeline::config::missing_key),
        help("add `{key} = <value>` to your purgeline.toml")
    )]
    MissingKey { key: String },

    /// A validation error for a config value.
    #[error("validation error: {message}")]
    #[diagnostic(code(purgeline::config::validation))]
    Validation { message: String },

    /// Catch-all for other configuration errors.
    #[error("configuration error: {0}")]
    #[diagnostic(code(purgeline::config::other))]
    Other(String),
}

fn format_unknown_key_help(suggestion: Option<&str>, valid_keys: &str) -> String {
    match suggestion {
        Some(s) => format!("did you mean `{s}`? Valid keys: {valid_keys}"),
        None => format!("valid keys: {valid_keys}"),
    }
}

/// Convert a `figment::Error` into a list of `ConfigError` diagnostics.
///
/// A figment error may carry several underlying errors; each becomes one
/// diagnostic.
pub fn figment_to_config_errors(
    err: figment::Error,
    toml_sources: &[(String, String)],
) -> Vec<ConfigError> {
    use figment::error::Kind;

    err.into_iter()
        .map(|error| {
            let key = dotted_path(&error);
            match &error.kind {
                Kind::UnknownField(field, expected) => {
                    let valid_keys: Vec<&str> = expected.to_vec();
                    let (span, src) = find_source_span(&error, field, toml_sources);
                    ConfigError::UnknownKey {
                        key: field.clone(),
                        suggestion: suggest_key(field, &valid_keys),
                        valid_keys: valid_keys.join(", "),
                        span,
                        src,
                    }
                }
                Kind::MissingField(field) => ConfigError::MissingKey {
                    key: field.clone().into_owned(),
                },
                Kind::InvalidType(actual, expected) => ConfigError::InvalidType {
                    key,
                    detail: format!("found {actual}, expected {expected}"),
                    expected: expected.to_string(),
                },
                Kind::UnknownVariant(found, expected) => ConfigError::InvalidValue {
                    key,
                    detail: format!("`{found}` is not one of: {}", expected.join(", ")),
                },
                _ => ConfigError::Other(format!("{error}")),
            }
        })
        .collect()
}

fn dotted_path(error: &figment::error::Error) -> String {
    error
        .path
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(".")
}

/// Locate the offending key inside whichever TOML file the error came from.
fn find_source_span(
    error: &figment::error::Error,
    field: &str,
    toml_sources: &[(String, String)],
) -> (Option<SourceSpan>, Option<NamedSource<String>>) {
    let source_path = error
        .metadata
        .as_ref()
        .and_then(|m| m.source.as_ref())
        .and_then(|s| match s {
            figment::Source::File(path) => Some(path.display().to_string()),
            _ => None,
        });

    let Some((path, content)) = source_path.as_ref().and_then(|path| {
        toml_sources
            .iter()
            .find(|(p, _)| p == path)
            .map(|(p, content)| (p.as_str(), content.as_str()))
    }) else {
        return (None, None);
    };

    let section: Vec<String> = error.path.iter().map(|s| s.to_string()).collect();
    match find_key_offset(content, &section, field) {
        Some(offset) => (
            Some(SourceSpan::new(offset.into(), field.len())),
            Some(NamedSource::new(path, content.to_string())),
        ),
        None => (None, None),
    }
}

/// Find the byte offset of a key in TOML content, relative to a section path.
///
/// For `path = ["purge"]` and `field = "rate_limit"`, finds the `[purge]`
/// header then the first line starting with `rate_limit`.
pub fn find_key_offset(content: &str, path: &[String], field: &str) -> Option<usize> {
    let search_start = match path.first() {
        None => 0,
        Some(section) => {
            let header = format!("[{section}]");
            content.find(&header).map(|pos| pos + header.len())?
        }
    };

    let mut byte_offset = 0;
    for line in content[search_start..].lines() {
        let trimmed = line.trim_start();
        if let Some(after) = trimmed.strip_prefix(field)
            && (after.starts_with(' ') || after.starts_with('=') || after.starts_with('\t'))
        {
            return Some(search_start + byte_offset + (line.len() - trimmed.len()));
        }
        byte_offset += line.len() + 1;
    }

    None
}

/// Suggest a similar key name using Jaro-Winkler string similarity.
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    valid_keys
        .iter()
        .map(|key| (strsim::jaro_winkler(unknown, key), *key))
        .filter(|(score, _)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, key)| key.to_string())
}

/// Render a list of `ConfigError`s to stderr using miette's graphical handler.
pub fn render_errors(errors: &[ConfigError]) {
    use miette::GraphicalReportHandler;

    let handler = GraphicalReportHandler::new();
    for error in errors {
        let mut buf = String::new();
        let diagnostic: &dyn Diagnostic = error;
        if handler.render_report(&mut buf, diagnostic).is_ok() {
            eprint!("{buf}");
        } else {
            eprintln!("Error: {error}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggests_rate_limit_key() {
        let valid = &["rate_limit_per_minute", "completion_display_secs", "max_attempts"];
        assert_eq!(
            suggest_key("rate_limit_per_minut", valid),
            Some("rate_limit_per_minute".to_string())
        );
    }

    #[test]
    fn suggests_batch_cap() {
        let valid = &["batch_cap", "model", "max_tokens"];
        assert_eq!(suggest_key("bacth_cap", valid), Some("batch_cap".to_string()));
    }

    #[test]
    fn no_suggestion_for_distant_typo() {
        let valid = &["batch_cap", "model", "max_tokens"];
        assert_eq!(suggest_key("zzzzzz", valid), None);
    }

    #[test]
    fn find_key_offset_in_section() {
        let content = "[general]\nlog_level = \"info\"\n[purge]\nmax_atempts = 2\n";
        let path = vec!["purge".to_string()];
        let o = find_key_offset(content, &path, "max_atempts").unwrap();
        assert_eq!(&content[o..o + 11], "max_atempts");
    }

    #[test]
    fn find_key_offset_missing_section() {
        let content = "[general]\nlog_level = \"info\"\n";
        let path = vec!["purge".to_string()];
        assert!(find_key_offset(content, &path, "log_level").is_none());
    }
}
