// SPDX-FileCopyrightText: 2026 Pwdex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for pwdex, the Password Exporter credential migration tool.
//!
//! This crate provides the canonical record model, the error taxonomy, and
//! the traits behind which the credential store and the foreign-field
//! decryption service sit. Every other pwdex crate builds on these.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::PwdexError;
pub use types::{
    DisabledHost, ExportFormat, FormatFailure, Header, LineEnding, PRODUCER_TAG, RawRecord,
    Record, RecordKind, SchemaVersion,
};

pub use traits::{CredentialStore, FieldDecryptor};
