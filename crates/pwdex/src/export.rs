// SPDX-FileCopyrightText: 2026 Pwdex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `pwdex export` and `pwdex export-disabled` command implementation.

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use chrono::Local;
use pwdex_config::PwdexConfig;
use pwdex_core::{ExportFormat, LineEnding, PwdexError, RecordKind};
use pwdex_format::default_file_name;
use pwdex_import::{export_disabled_from_store, export_store};
use pwdex_storage::SqliteCredentialStore;
use tracing::info;

#[derive(Debug)]
pub struct ExportOptions {
    pub format: ExportFormat,
    pub obfuscate: bool,
    pub line_ending: LineEnding,
    pub output: Option<PathBuf>,
}

pub fn run_export(config: &PwdexConfig, options: ExportOptions, plain: bool) -> Result<(), PwdexError> {
    let store = SqliteCredentialStore::from_config(&config.store)?;
    let report = export_store(&store, options.format, options.obfuscate, options.line_ending)?;
    store.close()?;

    let path = options.output.unwrap_or_else(|| {
        PathBuf::from(default_file_name(
            RecordKind::Saved,
            options.format,
            Local::now().date_naive(),
        ))
    });
    write_export(&path, &report.text)?;
    info!(path = %path.display(), count = report.count, "credentials exported");

    eprintln!("Exported {} logins to {}", report.count, path.display());
    if report.error_count > 0 {
        let header = format!("{} logins could not be exported:", report.error_count);
        eprintln!("{}", emphasize(&header, plain));
        for host in &report.failed {
            eprintln!("  {host}");
        }
    }
    Ok(())
}

pub fn run_export_disabled(
    config: &PwdexConfig,
    output: Option<PathBuf>,
) -> Result<(), PwdexError> {
    let store = SqliteCredentialStore::from_config(&config.store)?;
    let export = export_disabled_from_store(&store, config.export.line_ending)?;
    store.close()?;

    let path = output.unwrap_or_else(|| {
        PathBuf::from(default_file_name(
            RecordKind::Rejected,
            ExportFormat::Xml,
            Local::now().date_naive(),
        ))
    });
    write_export(&path, &export.text)?;
    info!(path = %path.display(), count = export.count, "disabled hosts exported");

    eprintln!("Exported {} disabled hosts to {}", export.count, path.display());
    Ok(())
}

fn write_export(path: &Path, text: &str) -> Result<(), PwdexError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, text)?;
    Ok(())
}

/// Yellow when stderr is a terminal and colors are allowed.
pub fn emphasize(text: &str, plain: bool) -> String {
    if !plain && std::io::stderr().is_terminal() {
        use colored::Colorize;
        text.yellow().to_string()
    } else {
        text.to_string()
    }
}
