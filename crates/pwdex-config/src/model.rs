// SPDX-FileCopyrightText: 2026 Pwdex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for pwdex.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::time::Duration;

use pwdex_core::{ExportFormat, LineEnding};
use serde::{Deserialize, Serialize};

/// Top-level pwdex configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PwdexConfig {
    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,

    /// Credential store settings.
    #[serde(default)]
    pub store: StoreConfig,

    /// Export file settings.
    #[serde(default)]
    pub export: ExportConfig,

    /// Import pipeline settings.
    #[serde(default)]
    pub import: ImportConfig,

    /// Foreign browser database settings.
    #[serde(default)]
    pub foreign: ForeignConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Credential store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Path to the SQLite credential store.
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|d| d.join("pwdex/logins.db").display().to_string())
        .unwrap_or_else(|| "pwdex-logins.db".to_string())
}

/// Export file configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ExportConfig {
    /// Default interchange format when `--format` is not given.
    #[serde(default = "default_format")]
    pub format: ExportFormat,

    /// Base64-obfuscate usernames and passwords by default.
    #[serde(default)]
    pub obfuscate: bool,

    /// Line terminator for written files.
    #[serde(default)]
    pub line_ending: LineEnding,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            obfuscate: false,
            line_ending: LineEnding::default(),
        }
    }
}

fn default_format() -> ExportFormat {
    ExportFormat::Xml
}

/// Import pipeline configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ImportConfig {
    /// Report progress every N inserted records.
    #[serde(default = "default_progress_every")]
    pub progress_every: usize,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            progress_every: default_progress_every(),
        }
    }
}

fn default_progress_every() -> usize {
    1
}

/// Foreign browser database configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ForeignConfig {
    /// Number of open-and-query attempts before giving up.
    #[serde(default = "default_retry_limit")]
    pub retry_limit: u32,

    /// Fixed wait between failed attempts, in milliseconds.
    #[serde(default = "default_retry_interval_ms")]
    pub retry_interval_ms: u64,

    /// Open the database without taking SQLite file locks.
    #[serde(default = "default_ignore_locks")]
    pub ignore_locks: bool,

    /// Human-readable database description used in error messages.
    #[serde(default = "default_description")]
    pub description: String,
}

impl ForeignConfig {
    pub fn retry_interval(&self) -> Duration {
        Duration::from_millis(self.retry_interval_ms)
    }
}

impl Default for ForeignConfig {
    fn default() -> Self {
        Self {
            retry_limit: default_retry_limit(),
            retry_interval_ms: default_retry_interval_ms(),
            ignore_locks: default_ignore_locks(),
            description: default_description(),
        }
    }
}

fn default_retry_limit() -> u32 {
    10
}

fn default_retry_interval_ms() -> u64 {
    100
}

fn default_ignore_locks() -> bool {
    true
}

fn default_description() -> String {
    "Chrome passwords".to_string()
}
