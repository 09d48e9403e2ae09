// SPDX-FileCopyrightText: 2026 Pwdex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Foreign row source that fails a fixed number of times before answering.

use std::sync::Mutex;
use std::time::Instant;

use pwdex_core::PwdexError;
use pwdex_foreign::{ForeignRow, RowSource};

/// Returns a lock error for the first `failures` calls, then `rows`.
///
/// Every call is timestamped so tests can check retry spacing.
pub struct FlakyRowSource {
    failures: usize,
    rows: Vec<ForeignRow>,
    calls: Mutex<Vec<Instant>>,
}

impl FlakyRowSource {
    pub fn new(failures: usize, rows: Vec<ForeignRow>) -> Self {
        Self {
            failures,
            rows,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A source that never succeeds.
    pub fn always_failing() -> Self {
        Self::new(usize::MAX, Vec::new())
    }

    /// When each attempt was made.
    pub fn attempts(&self) -> Vec<Instant> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

impl RowSource for FlakyRowSource {
    fn fetch_rows(&self) -> Result<Vec<ForeignRow>, PwdexError> {
        let mut calls = self
            .calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        calls.push(Instant::now());
        if calls.len() <= self.failures {
            return Err(PwdexError::ForeignRead {
                source: "database is locked".into(),
            });
        }
        Ok(self.rows.clone())
    }
}
