// SPDX-FileCopyrightText: 2026 Pwdex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! pwdex - export, import and migrate saved browser credentials.
//!
//! This is the binary entry point.

mod export;
mod import;
mod list;
mod progress;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use pwdex_config::PwdexConfig;
use pwdex_core::{ExportFormat, LineEnding, PwdexError};

/// pwdex - export, import and migrate saved browser credentials.
#[derive(Parser, Debug)]
#[command(name = "pwdex", version, about, long_about = None)]
struct Cli {
    /// Configuration file to use instead of the standard locations.
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Credential store database, overriding `store.database_path`.
    #[arg(long, global = true, value_name = "DB")]
    store: Option<PathBuf>,

    /// Disable colors and the progress bar.
    #[arg(long, global = true)]
    plain: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Export saved credentials to an XML or CSV file.
    Export {
        #[arg(long, value_parser = parse_format)]
        format: Option<ExportFormat>,

        /// Base64-obfuscate usernames and passwords.
        #[arg(long)]
        obfuscate: bool,

        #[arg(long, value_parser = parse_line_ending)]
        line_ending: Option<LineEnding>,

        /// Output file; defaults to a dated name in the current directory.
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Export the list of hosts for which saving is disabled.
    ExportDisabled {
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Import credentials from an export file or a browser `Login Data` database.
    Import {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Import a disabled-hosts export.
    ImportDisabled {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// List saved credentials (passwords are not shown).
    List,
}

fn parse_format(s: &str) -> Result<ExportFormat, String> {
    s.parse()
        .map_err(|_| format!("unknown format `{s}` (expected xml or csv)"))
}

fn parse_line_ending(s: &str) -> Result<LineEnding, String> {
    s.parse()
        .map_err(|_| format!("unknown line ending `{s}` (expected lf or crlf)"))
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => pwdex_config::load_and_validate_path(path),
        None => pwdex_config::load_and_validate(),
    };
    let mut config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            pwdex_config::render_errors(&errors);
            std::process::exit(1);
        }
    };
    if let Some(store) = &cli.store {
        config.store.database_path = store.display().to_string();
    }

    init_tracing(&config.log.level);

    if let Err(err) = run(cli, config).await {
        tracing::debug!(error = ?err, "command failed");
        eprintln!("pwdex: {err}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: PwdexConfig) -> Result<(), PwdexError> {
    let plain = cli.plain;
    match cli.command {
        Commands::Export {
            format,
            obfuscate,
            line_ending,
            output,
        } => {
            let options = export::ExportOptions {
                format: format.unwrap_or(config.export.format),
                obfuscate: obfuscate || config.export.obfuscate,
                line_ending: line_ending.unwrap_or(config.export.line_ending),
                output,
            };
            export::run_export(&config, options, plain)
        }
        Commands::ExportDisabled { output } => export::run_export_disabled(&config, output),
        Commands::Import { file } => import::run_import(config, file, plain).await,
        Commands::ImportDisabled { file } => import::run_import_disabled(&config, &file, plain),
        Commands::List => list::run_list(&config),
    }
}

/// Initializes the tracing subscriber with the given log level.
///
/// Logs go to stderr so exported documents can be piped from stdout.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("pwdex={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn export_flags_parse() {
        let cli = Cli::try_parse_from([
            "pwdex",
            "--store",
            "/tmp/x.db",
            "export",
            "--format",
            "csv",
            "--obfuscate",
            "--line-ending",
            "crlf",
            "-o",
            "out.csv",
        ])
        .unwrap();
        assert_eq!(cli.store, Some(PathBuf::from("/tmp/x.db")));
        match cli.command {
            Commands::Export {
                format,
                obfuscate,
                line_ending,
                output,
            } => {
                assert_eq!(format, Some(ExportFormat::Csv));
                assert!(obfuscate);
                assert_eq!(line_ending, Some(LineEnding::Crlf));
                assert_eq!(output, Some(PathBuf::from("out.csv")));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn unknown_format_is_a_usage_error() {
        assert!(Cli::try_parse_from(["pwdex", "export", "--format", "json"]).is_err());
    }

    #[test]
    fn import_requires_a_file() {
        assert!(Cli::try_parse_from(["pwdex", "import"]).is_err());
        let cli = Cli::try_parse_from(["pwdex", "import", "Login Data"]).unwrap();
        assert!(matches!(cli.command, Commands::Import { ref file } if file == &PathBuf::from("Login Data")));
    }
}
