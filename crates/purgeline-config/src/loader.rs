// SPDX-FileCopyrightText: 2026 Purgeline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./purgeline.toml` > `~/.config/purgeline/purgeline.toml` >
//! `/etc/purgeline/purgeline.toml` with environment variable overrides via `PURGELINE_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::PurgelineConfig;

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/purgeline/purgeline.toml";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "purgeline.toml";

/// Sections that `PURGELINE_<SECTION>_<KEY>` variables map onto.
const ENV_SECTIONS: &[&str] = &[
    "general", "archive", "filter", "purge", "audit", "anthropic", "remote",
];

/// Path of the per-user config file, if the platform has a config dir.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("purgeline").join(LOCAL_CONFIG_FILE))
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/purgeline/purgeline.toml` (system-wide)
/// 3. `~/.config/purgeline/purgeline.toml` (user XDG config)
/// 4. `./purgeline.toml` (local directory)
/// 5. `PURGELINE_*` environment variables
pub fn load_config() -> Result<PurgelineConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from an inline TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<PurgelineConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PurgelineConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<PurgelineConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PurgelineConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for hierarchy loading, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(PurgelineConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// Create the environment variable provider.
///
/// Uses `Env::map()` rather than `Env::split("_")` so keys that contain
/// underscores survive: `PURGELINE_PURGE_RATE_LIMIT_PER_MINUTE` maps to
/// `purge.rate_limit_per_minute`, not `purge.rate.limit.per.minute`.
fn env_provider() -> Env {
    Env::prefixed("PURGELINE_").map(|key| map_env_key(key.as_str()).into())
}

/// Map a lowercased, prefix-stripped env key onto its dotted config path.
fn map_env_key(key: &str) -> String {
    for section in ENV_SECTIONS {
        if let Some(rest) = key.strip_prefix(section).and_then(|r| r.strip_prefix('_')) {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_map_to_sections() {
        assert_eq!(
            map_env_key("purge_rate_limit_per_minute"),
            "purge.rate_limit_per_minute"
        );
        assert_eq!(map_env_key("remote_bearer_token"), "remote.bearer_token");
        assert_eq!(map_env_key("general_log_level"), "general.log_level");
    }

    #[test]
    fn unknown_section_is_left_alone() {
        assert_eq!(map_env_key("something_else"), "something_else");
    }
}
