// SPDX-FileCopyrightText: 2026 Pwdex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `pwdex import` and `pwdex import-disabled` command implementation.
//!
//! The import itself is blocking (SQLite, foreign read retries), so it runs
//! on the blocking pool while the async side waits for Ctrl+C and cancels
//! the insertion pipeline.

use std::path::{Path, PathBuf};

use pwdex_config::PwdexConfig;
use pwdex_core::PwdexError;
use pwdex_foreign::decryptor_from_env;
use pwdex_import::{DisabledImportReport, ImportReport, Importer};
use pwdex_storage::SqliteCredentialStore;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::export::emphasize;
use crate::progress::BarObserver;

pub async fn run_import(config: PwdexConfig, file: PathBuf, plain: bool) -> Result<(), PwdexError> {
    let cancel = CancellationToken::new();
    let interrupt = install_interrupt_handler(cancel.clone());

    let report = tokio::task::spawn_blocking(move || -> Result<ImportReport, PwdexError> {
        let decryptor = decryptor_from_env()?;
        let store = SqliteCredentialStore::from_config(&config.store)?;
        let importer = Importer::from_config(&store, cancel, &config.import);
        let mut observer = BarObserver::new(plain);
        let report = importer.import_path(&file, &config.foreign, decryptor.as_ref(), &mut observer);
        store.close()?;
        report
    })
    .await;
    interrupt.abort();

    let report = report.map_err(|e| PwdexError::Io {
        source: std::io::Error::other(e),
    })??;
    print_import_summary(&report, plain);
    Ok(())
}

pub fn run_import_disabled(config: &PwdexConfig, file: &Path, plain: bool) -> Result<(), PwdexError> {
    let store = SqliteCredentialStore::from_config(&config.store)?;
    let report = Importer::new(&store, CancellationToken::new()).import_disabled_path(file)?;
    store.close()?;
    print_disabled_summary(&report, plain);
    Ok(())
}

/// Cancels `token` on Ctrl+C. Abort the returned task once the work is done.
fn install_interrupt_handler(token: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("received Ctrl+C, cancelling import");
            token.cancel();
        } else {
            debug!("Ctrl+C handler unavailable");
        }
    })
}

fn print_import_summary(report: &ImportReport, plain: bool) {
    let batch = &report.batch;
    if batch.cancelled {
        eprintln!(
            "Import cancelled: {} of {} logins imported",
            batch.inserted_count, batch.total_count
        );
    } else {
        eprintln!(
            "Imported {} of {} logins",
            batch.inserted_count, batch.total_count
        );
    }

    if !report.format_failures.is_empty() {
        let header = format!("{} entries could not be read:", report.format_failures.len());
        eprintln!("{}", emphasize(&header, plain));
        for failure in &report.format_failures {
            eprintln!("  {failure}");
        }
    }
    if !batch.failures.is_empty() {
        let header = format!("{} logins could not be imported:", batch.failures.len());
        eprintln!("{}", emphasize(&header, plain));
        for failure in &batch.failures {
            eprintln!("  {failure}");
        }
    }
}

fn print_disabled_summary(report: &DisabledImportReport, plain: bool) {
    eprintln!(
        "Disabled saving for {} of {} hosts",
        report.imported_count, report.total_count
    );
    if !report.failures.is_empty() {
        let header = format!("{} hosts could not be imported:", report.failures.len());
        eprintln!("{}", emphasize(&header, plain));
        for failure in &report.failures {
            eprintln!("  {failure}");
        }
    }
}
