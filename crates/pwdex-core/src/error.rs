// SPDX-FileCopyrightText: 2026 Pwdex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for credential export and import.

use thiserror::Error;

/// The primary error type used across all pwdex crates.
///
/// Variants fall into three groups:
/// - structural input errors, fatal to the whole operation and raised before
///   anything is written to the store (see [`PwdexError::is_fatal_input`]);
/// - per-record errors, which callers collect and report at the end;
/// - collaborator errors (storage, I/O, foreign database, decryption).
#[derive(Debug, Error)]
pub enum PwdexError {
    /// Neither CSV header form matched the first lines of the input.
    #[error("cannot read export header: {0}")]
    Header(String),

    /// The XML document has no `<entries>` element.
    #[error("export header missing: no <entries> element found")]
    MissingHeader,

    /// The XML parser rejected the document.
    #[error("malformed XML document: {detail}")]
    MalformedDocument { detail: String },

    /// The file was not produced by Password Exporter.
    #[error("unrecognized producer `{found}`: not a Password Exporter file")]
    UnrecognizedProducer { found: String },

    /// A disabled-hosts file was fed to the credentials importer, or vice versa.
    #[error("wrong file kind: expected a `{expected}` export, found `{found}`")]
    WrongFileKind { expected: String, found: String },

    /// The export was written by a future or unknown version of the format.
    #[error("unsupported export format version `{version}` (future/unknown version)")]
    UnsupportedVersion { version: String },

    /// A raw record could not be turned into a canonical record.
    #[error("cannot normalize record for `{hostname}`: {reason}")]
    Normalize { hostname: String, reason: String },

    /// The credential store rejected a record.
    #[error("cannot insert record for `{hostname}`: {reason}")]
    Insert { hostname: String, reason: String },

    /// A record failed model validation.
    #[error("invalid record: {0}")]
    InvalidRecord(String),

    /// The foreign database could not be read after every retry.
    #[error("couldn't get rows from the {description} database after {attempts} attempts")]
    ForeignReadExhausted { description: String, attempts: u32 },

    /// A single attempt at reading the foreign database failed.
    #[error("foreign database read failed: {source}")]
    ForeignRead {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A foreign row carried an authentication scheme we cannot map.
    #[error("login data scheme type not supported: {0}")]
    UnsupportedScheme(i64),

    /// A natively encrypted field could not be decrypted.
    #[error("decryption failed: {0}")]
    Decrypt(String),

    /// The credential store is locked (master password not entered).
    #[error("credential store is locked")]
    StoreLocked,

    /// Credential store backend errors.
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// File system errors while reading or writing export files.
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Configuration errors detected at runtime.
    #[error("configuration error: {0}")]
    Config(String),
}

impl PwdexError {
    /// Returns true for errors that reject the input file as a whole.
    ///
    /// These abort an import before any record reaches the store.
    pub fn is_fatal_input(&self) -> bool {
        matches!(
            self,
            Self::Header(_)
                | Self::MissingHeader
                | Self::MalformedDocument { .. }
                | Self::UnrecognizedProducer { .. }
                | Self::WrongFileKind { .. }
                | Self::UnsupportedVersion { .. }
        )
    }

    /// Wrap any storage backend error.
    pub fn storage<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Storage {
            source: Box::new(err),
        }
    }
}
