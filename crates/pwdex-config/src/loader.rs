// SPDX-FileCopyrightText: 2026 Pwdex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./pwdex.toml` > `~/.config/pwdex/pwdex.toml` > `/etc/pwdex/pwdex.toml`
//! with environment variable overrides via `PWDEX_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::PwdexConfig;

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/pwdex/pwdex.toml";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "pwdex.toml";

/// Path of the per-user config file, if the platform has a config directory.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("pwdex/pwdex.toml"))
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/pwdex/pwdex.toml` (system-wide)
/// 3. `~/.config/pwdex/pwdex.toml` (user XDG config)
/// 4. `./pwdex.toml` (local directory)
/// 5. `PWDEX_*` environment variables
pub fn load_config() -> Result<PwdexConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<PwdexConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PwdexConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<PwdexConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PwdexConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for diagnostic use).
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(PwdexConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `PWDEX_FOREIGN_RETRY_LIMIT` must map to `foreign.retry_limit`,
/// not `foreign.retry.limit`.
fn env_provider() -> Env {
    Env::prefixed("PWDEX_")
        .ignore(&["foreign_key"])
        .map(|key| {
            let mapped = key
                .as_str()
                .replacen("log_", "log.", 1)
                .replacen("store_", "store.", 1)
                .replacen("export_", "export.", 1)
                .replacen("import_", "import.", 1)
                .replacen("foreign_", "foreign.", 1);
            mapped.into()
        })
}
