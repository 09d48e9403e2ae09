// SPDX-FileCopyrightText: 2026 Pwdex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as non-empty paths and bounded retry settings.

use crate::diagnostic::ConfigError;
use crate::model::PwdexConfig;

/// Upper bound on the wait between foreign database attempts.
const MAX_RETRY_INTERVAL_MS: u64 = 10_000;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &PwdexConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.log.level.to_ascii_lowercase().as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "log.level `{}` is not one of {}",
                config.log.level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if config.store.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "store.database_path must not be empty".to_string(),
        });
    }

    if config.import.progress_every < 1 {
        errors.push(ConfigError::Validation {
            message: "import.progress_every must be at least 1".to_string(),
        });
    }

    if config.foreign.retry_limit < 1 {
        errors.push(ConfigError::Validation {
            message: format!(
                "foreign.retry_limit must be at least 1, got {}",
                config.foreign.retry_limit
            ),
        });
    }

    if config.foreign.retry_interval_ms > MAX_RETRY_INTERVAL_MS {
        errors.push(ConfigError::Validation {
            message: format!(
                "foreign.retry_interval_ms must be at most {MAX_RETRY_INTERVAL_MS}, got {}",
                config.foreign.retry_interval_ms
            ),
        });
    }

    if config.foreign.description.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "foreign.description must not be empty".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
