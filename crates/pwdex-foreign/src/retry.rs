// SPDX-FileCopyrightText: 2026 Pwdex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded retry around foreign database reads.
//!
//! The foreign browser may be writing its database while we read it. Rather
//! than wait on its lock, each attempt fails fast and we try again after a
//! fixed interval.

use std::time::Duration;

use pwdex_config::model::ForeignConfig;
use pwdex_core::PwdexError;
use tracing::{debug, info, warn};

use crate::reader::RowSource;
use crate::scheme::ForeignRow;

/// How many times to try, and how long to wait after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub interval: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 10,
            interval: Duration::from_millis(100),
        }
    }
}

impl From<&ForeignConfig> for RetryPolicy {
    fn from(config: &ForeignConfig) -> Self {
        Self {
            attempts: config.retry_limit,
            interval: config.retry_interval(),
        }
    }
}

/// Read every row from `source`, retrying failed attempts.
///
/// Blocks the calling thread between attempts. Only the first failure is
/// logged at warn level; the rest are usually the same lock contention.
pub fn read_foreign_rows<S>(
    source: &S,
    policy: RetryPolicy,
    description: &str,
) -> Result<Vec<ForeignRow>, PwdexError>
where
    S: RowSource + ?Sized,
{
    let attempts = policy.attempts.max(1);

    for attempt in 1..=attempts {
        match source.fetch_rows() {
            Ok(rows) => {
                if attempt > 1 {
                    info!(attempt, description, "foreign database read after retrying");
                }
                debug!(rows = rows.len(), description, "foreign rows fetched");
                return Ok(rows);
            }
            Err(err) => {
                if attempt == 1 {
                    warn!(error = %err, description, "foreign database read failed, retrying");
                } else {
                    debug!(error = %err, attempt, description, "foreign database read failed again");
                }
                if attempt < attempts {
                    std::thread::sleep(policy.interval);
                }
            }
        }
    }

    Err(PwdexError::ForeignReadExhausted {
        description: description.to_string(),
        attempts,
    })
}
