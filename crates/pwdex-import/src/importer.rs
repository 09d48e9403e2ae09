// SPDX-FileCopyrightText: 2026 Pwdex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Import and export operations against a credential store.
//!
//! Every import validates its input as a whole before the first insert: a
//! bad header, wrong file kind or unsupported version leaves the store
//! untouched. Per-record problems are collected into the returned report.

use std::path::Path;

use pwdex_config::model::{ForeignConfig, ImportConfig};
use pwdex_core::{
    CredentialStore, DisabledHost, ExportFormat, FieldDecryptor, FormatFailure, Header,
    LineEnding, PwdexError, Record,
};
use pwdex_format::{ExportReport, decode_export, export_disabled_hosts, export_records};
use pwdex_foreign::{RetryPolicy, RowSource, SqliteLoginSource, read_foreign_records};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::pipeline::{ImportBatch, ImportObserver, InsertFailure, InsertPipeline};
use crate::source::ImportSource;

/// Result of importing saved credentials.
#[derive(Debug, Clone)]
pub struct ImportReport {
    pub header: Header,
    pub batch: ImportBatch,
    /// Entries dropped before insertion: malformed rows, records that could
    /// not be normalized, unmappable foreign rows.
    pub format_failures: Vec<FormatFailure>,
}

impl ImportReport {
    /// Whether anything at all went wrong with individual records.
    pub fn has_failures(&self) -> bool {
        !self.format_failures.is_empty() || !self.batch.failures.is_empty()
    }
}

/// Result of importing a disabled-hosts file.
#[derive(Debug, Clone, Default)]
pub struct DisabledImportReport {
    pub total_count: usize,
    pub imported_count: usize,
    pub failures: Vec<InsertFailure>,
}

/// A disabled-hosts export ready to be written.
#[derive(Debug, Clone)]
pub struct DisabledExport {
    pub text: String,
    pub count: usize,
}

/// Runs imports into one credential store.
pub struct Importer<'a, S: CredentialStore + ?Sized> {
    store: &'a S,
    cancel: CancellationToken,
    progress_every: usize,
}

impl<'a, S: CredentialStore + ?Sized> Importer<'a, S> {
    pub fn new(store: &'a S, cancel: CancellationToken) -> Self {
        Self {
            store,
            cancel,
            progress_every: 1,
        }
    }

    pub fn from_config(store: &'a S, cancel: CancellationToken, config: &ImportConfig) -> Self {
        Self {
            progress_every: config.progress_every.max(1),
            ..Self::new(store, cancel)
        }
    }

    /// Import a Password Exporter document already read into memory.
    pub fn import_text<O>(
        &self,
        text: &str,
        format: ExportFormat,
        observer: &mut O,
    ) -> Result<ImportReport, PwdexError>
    where
        O: ImportObserver + ?Sized,
    {
        ensure_unlocked(self.store)?;
        let (header, body) = decode_export(text, format)?;
        info!(
            format = %format,
            version = %header.schema_version,
            encrypted = header.encrypted,
            records = body.records.len(),
            dropped = body.failures.len(),
            "export file accepted"
        );
        Ok(self.insert_all(header, body.records, body.failures, observer))
    }

    /// Import every row of a foreign credential database.
    pub fn import_foreign<R, O>(
        &self,
        source: &R,
        policy: RetryPolicy,
        description: &str,
        decryptor: &dyn FieldDecryptor,
        observer: &mut O,
    ) -> Result<ImportReport, PwdexError>
    where
        R: RowSource + ?Sized,
        O: ImportObserver + ?Sized,
    {
        ensure_unlocked(self.store)?;
        let foreign = read_foreign_records(source, policy, description, decryptor)?;
        Ok(self.insert_all(Header::foreign(), foreign.records, foreign.failures, observer))
    }

    /// Import from a file, choosing the route with [`ImportSource::sniff`].
    pub fn import_path<O>(
        &self,
        path: &Path,
        foreign: &ForeignConfig,
        decryptor: &dyn FieldDecryptor,
        observer: &mut O,
    ) -> Result<ImportReport, PwdexError>
    where
        O: ImportObserver + ?Sized,
    {
        match ImportSource::sniff(path) {
            ImportSource::Export { path, format } => {
                let text = read_text(&path)?;
                self.import_text(&text, format, observer)
            }
            ImportSource::Foreign { path } => {
                let source = SqliteLoginSource::new(path, foreign.ignore_locks);
                self.import_foreign(
                    &source,
                    RetryPolicy::from(foreign),
                    &foreign.description,
                    decryptor,
                    observer,
                )
            }
        }
    }

    /// Disable credential saving for every host listed in a `rejected` document.
    pub fn import_disabled_text(&self, text: &str) -> Result<DisabledImportReport, PwdexError> {
        ensure_unlocked(self.store)?;
        let hosts = pwdex_format::read_disabled_export(text)?;
        Ok(disable_hosts(self.store, &hosts))
    }

    pub fn import_disabled_path(&self, path: &Path) -> Result<DisabledImportReport, PwdexError> {
        let text = read_text(path)?;
        self.import_disabled_text(&text)
    }

    fn insert_all<O>(
        &self,
        header: Header,
        records: Vec<Record>,
        format_failures: Vec<FormatFailure>,
        observer: &mut O,
    ) -> ImportReport
    where
        O: ImportObserver + ?Sized,
    {
        let batch = InsertPipeline::new(self.store, records, self.cancel.clone())
            .with_progress_every(self.progress_every)
            .run(observer);
        ImportReport {
            header,
            batch,
            format_failures,
        }
    }
}

fn disable_hosts<S: CredentialStore + ?Sized>(store: &S, hosts: &[DisabledHost]) -> DisabledImportReport {
    let mut report = DisabledImportReport {
        total_count: hosts.len(),
        ..Default::default()
    };
    for host in hosts {
        match store.set_saving_enabled(&host.hostname, false) {
            Ok(()) => report.imported_count += 1,
            Err(err) => {
                warn!(host = %host.hostname, error = %err, "disabled host not imported");
                report.failures.push(InsertFailure {
                    hostname: host.hostname.clone(),
                    reason: err.to_string(),
                });
            }
        }
    }
    info!(
        total = report.total_count,
        imported = report.imported_count,
        failed = report.failures.len(),
        "disabled hosts imported"
    );
    report
}

/// Serialize every saved credential in the store.
pub fn export_store<S: CredentialStore + ?Sized>(
    store: &S,
    format: ExportFormat,
    obfuscate_credentials: bool,
    line_ending: LineEnding,
) -> Result<ExportReport, PwdexError> {
    ensure_unlocked(store)?;
    let records = store.list_all()?;
    Ok(export_records(&records, format, obfuscate_credentials, line_ending))
}

/// Serialize the store's disabled hosts.
pub fn export_disabled_from_store<S: CredentialStore + ?Sized>(
    store: &S,
    line_ending: LineEnding,
) -> Result<DisabledExport, PwdexError> {
    ensure_unlocked(store)?;
    let hosts = store.disabled_hosts()?;
    let report = export_disabled_hosts(&hosts, line_ending);
    Ok(DisabledExport {
        text: report.text,
        count: report.count,
    })
}

fn ensure_unlocked<S: CredentialStore + ?Sized>(store: &S) -> Result<(), PwdexError> {
    if store.is_unlocked() {
        Ok(())
    } else {
        Err(PwdexError::StoreLocked)
    }
}

/// Export files are nominally UTF-8; invalid sequences are replaced rather
/// than failing the whole import.
fn read_text(path: &Path) -> Result<String, PwdexError> {
    let bytes = std::fs::read(path)?;
    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => {
            warn!(path = %path.display(), "export file is not valid UTF-8, replacing invalid bytes");
            String::from_utf8_lossy(err.as_bytes()).into_owned()
        }
    })
}
