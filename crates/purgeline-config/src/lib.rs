// SPDX-FileCopyrightText: 2026 Purgeline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for Purgeline.
//!
//! Provides TOML configuration parsing with strict validation (`deny_unknown_fields`),
//! XDG file hierarchy lookup, environment variable overrides, and miette
//! diagnostics with typo suggestions.
//!
//! # Usage
//!
//! ```no_run
//! use purgeline_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("rate limit: {}/min", config.purge.rate_limit_per_minute);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use std::path::Path;

pub use diagnostic::{render_errors, ConfigError};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::PurgelineConfig;

/// Load configuration from the XDG hierarchy and validate it.
///
/// On figment errors the TOML sources are re-read so diagnostics can point
/// at the offending line.
pub fn load_and_validate() -> Result<PurgelineConfig, Vec<ConfigError>> {
    match loader::load_config() {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(
            err,
            &collect_toml_sources(),
        )),
    }
}

/// Load configuration from an explicit file (plus env overrides) and validate it.
pub fn load_and_validate_path(path: &Path) -> Result<PurgelineConfig, Vec<ConfigError>> {
    match loader::load_config_from_path(path) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => {
            let sources = std::fs::read_to_string(path)
                .map(|content| vec![(path.display().to_string(), content)])
                .unwrap_or_default();
            Err(diagnostic::figment_to_config_errors(err, &sources))
        }
    }
}

/// Load configuration from a TOML string and validate it.
pub fn load_and_validate_str(toml_content: &str) -> Result<PurgelineConfig, Vec<ConfigError>> {
    match loader::load_config_from_str(toml_content) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => {
            let sources = vec![("<inline>".to_string(), toml_content.to_string())];
            Err(diagnostic::figment_to_config_errors(err, &sources))
        }
    }
}

/// Collect TOML source file contents for error span resolution.
fn collect_toml_sources() -> Vec<(String, String)> {
    let mut sources = Vec::new();

    if let Ok(content) = std::fs::read_to_string(loader::LOCAL_CONFIG_FILE) {
        let path = std::env::current_dir()
            .map(|d| d.join(loader::LOCAL_CONFIG_FILE).display().to_string())
            .unwrap_or_else(|_| loader::LOCAL_CONFIG_FILE.to_string());
        sources.push((path, content));
    }

    if let Some(path) = loader::user_config_path()
        && let Ok(content) = std::fs::read_to_string(&path)
    {
        sources.push((path.display().to_string(), content));
    }

    if let Ok(content) = std::fs::read_to_string(loader::SYSTEM_CONFIG_PATH) {
        sources.push((loader::SYSTEM_CONFIG_PATH.to_string(), content));
    }

    sources
}
