// SPDX-FileCopyrightText: 2026 Purgeline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as rate-limit bounds and non-empty category sets.

use crate::diagnostic::ConfigError;
use crate::model::PurgelineConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Highest accepted removal rate (one per 100 ms).
const MAX_RATE_LIMIT_PER_MINUTE: u32 = 600;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &PurgelineConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.general.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "general.log_level `{}` must be one of: {}",
                config.general.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    let limit = config.purge.rate_limit_per_minute;
    if limit == 0 || limit > MAX_RATE_LIMIT_PER_MINUTE {
        errors.push(ConfigError::Validation {
            message: format!(
                "purge.rate_limit_per_minute must be between 1 and {MAX_RATE_LIMIT_PER_MINUTE}, got {limit}"
            ),
        });
    }

    if config.purge.max_attempts == 0 {
        errors.push(ConfigError::Validation {
            message: "purge.max_attempts must be at least 1".to_string(),
        });
    }

    if config.audit.batch_cap == 0 {
        errors.push(ConfigError::Validation {
            message: "audit.batch_cap must be at least 1".to_string(),
        });
    }

    if config.filter.categories.is_empty() {
        errors.push(ConfigError::Validation {
            message: "filter.categories must name at least one category".to_string(),
        });
    }

    if config.remote.base_url.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "remote.base_url must not be empty".to_string(),
        });
    } else if !config.remote.base_url.starts_with("http://")
        && !config.remote.base_url.starts_with("https://")
    {
        errors.push(ConfigError::Validation {
            message: format!(
                "remote.base_url `{}` must be an http(s) URL",
                config.remote.base_url
            ),
        });
    }

    if config.remote.timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "remote.timeout_secs must be at least 1".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
