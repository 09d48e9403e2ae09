// SPDX-FileCopyrightText: 2026 Pwdex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Record-at-a-time insertion into the credential store.
//!
//! [`InsertPipeline`] is a cursor: each [`InsertPipeline::step`] inserts at
//! most one record, so a caller can interleave progress reporting and
//! cancellation checks with the work. [`InsertPipeline::run`] drives it to
//! the end.

use std::fmt;

use pwdex_core::{CredentialStore, PwdexError, Record};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// A record the store refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertFailure {
    pub hostname: String,
    pub reason: String,
}

impl fmt::Display for InsertFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.hostname, self.reason)
    }
}

/// State of one import, returned by value once the pipeline stops.
#[derive(Debug, Clone, Default)]
pub struct ImportBatch {
    pub records: Vec<Record>,
    pub total_count: usize,
    pub inserted_count: usize,
    pub failures: Vec<InsertFailure>,
    pub cancelled: bool,
}

impl ImportBatch {
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            total_count: records.len(),
            records,
            ..Default::default()
        }
    }

    /// Records neither inserted nor failed (non-zero only after cancellation).
    pub fn skipped_count(&self) -> usize {
        self.total_count - self.inserted_count - self.failures.len()
    }
}

/// Outcome of a single [`InsertPipeline::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepResult {
    Inserted,
    Failed,
    Cancelled,
    Finished,
}

/// Snapshot handed to [`ImportObserver::on_progress`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub processed: usize,
    pub inserted: usize,
    pub total: usize,
}

impl Progress {
    pub fn percent(&self) -> usize {
        if self.total == 0 {
            100
        } else {
            self.processed * 100 / self.total
        }
    }
}

/// Receives progress while a pipeline runs.
pub trait ImportObserver {
    fn on_progress(&mut self, _progress: Progress) {}

    /// Called exactly once, after the last step.
    fn on_complete(&mut self, _batch: &ImportBatch) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ImportObserver for NoopObserver {}

/// Cursor over the records of one import.
pub struct InsertPipeline<'a, S: CredentialStore + ?Sized> {
    store: &'a S,
    batch: ImportBatch,
    cursor: usize,
    cancel: CancellationToken,
    progress_every: usize,
}

impl<'a, S: CredentialStore + ?Sized> InsertPipeline<'a, S> {
    pub fn new(store: &'a S, records: Vec<Record>, cancel: CancellationToken) -> Self {
        Self {
            store,
            batch: ImportBatch::new(records),
            cursor: 0,
            cancel,
            progress_every: 1,
        }
    }

    /// Report progress every `n` processed records instead of every one.
    pub fn with_progress_every(mut self, n: usize) -> Self {
        self.progress_every = n.max(1);
        self
    }

    pub fn batch(&self) -> &ImportBatch {
        &self.batch
    }

    pub fn progress(&self) -> Progress {
        Progress {
            processed: self.cursor,
            inserted: self.batch.inserted_count,
            total: self.batch.total_count,
        }
    }

    /// Insert the next record, if any.
    ///
    /// Cancellation is checked before each record; once cancelled or
    /// finished, further calls return the same result without touching the
    /// store.
    pub fn step(&mut self) -> StepResult {
        if self.batch.cancelled {
            return StepResult::Cancelled;
        }
        if self.cursor >= self.batch.total_count {
            return StepResult::Finished;
        }
        if self.cancel.is_cancelled() {
            self.batch.cancelled = true;
            info!(
                processed = self.cursor,
                total = self.batch.total_count,
                "import cancelled"
            );
            return StepResult::Cancelled;
        }

        let record = &mut self.batch.records[self.cursor];
        self.cursor += 1;
        record.enforce_realm_exclusion();

        debug!(
            hostname = %record.hostname,
            http_realm = ?record.http_realm,
            form_submit_url = ?record.form_submit_url,
            username_field = %record.username_field,
            password_field = %record.password_field,
            "adding login"
        );

        match self.store.insert(record) {
            Ok(()) => {
                self.batch.inserted_count += 1;
                StepResult::Inserted
            }
            Err(err) => {
                warn!(hostname = %record.hostname, error = %err, "login not imported");
                let reason = match err {
                    PwdexError::Insert { reason, .. } => reason,
                    other => other.to_string(),
                };
                self.batch.failures.push(InsertFailure {
                    hostname: record.hostname.clone(),
                    reason,
                });
                StepResult::Failed
            }
        }
    }

    /// Drive the cursor to the end (or to cancellation) and hand back the batch.
    pub fn run<O: ImportObserver + ?Sized>(mut self, observer: &mut O) -> ImportBatch {
        loop {
            match self.step() {
                StepResult::Inserted | StepResult::Failed => {
                    let progress = self.progress();
                    if progress.processed % self.progress_every == 0
                        || progress.processed == progress.total
                    {
                        observer.on_progress(progress);
                    }
                }
                StepResult::Cancelled | StepResult::Finished => break,
            }
        }

        info!(
            total = self.batch.total_count,
            inserted = self.batch.inserted_count,
            failed = self.batch.failures.len(),
            cancelled = self.batch.cancelled,
            "import finished"
        );
        observer.on_complete(&self.batch);
        self.batch
    }
}
