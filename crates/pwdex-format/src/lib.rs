// SPDX-FileCopyrightText: 2026 Pwdex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Password Exporter file formats.
//!
//! Writes the current (1.1) XML and CSV layouts and reads every historical
//! variant: XML 1.0.x, XML 1.1, CSV 1.0.x and CSV 1.1. Reading is split into
//! header validation, body parsing and normalization so that a bad header
//! is rejected before any record is looked at.

pub mod escape;
pub mod export;
pub mod header;
pub mod normalize;
pub mod obfuscate;
pub mod parse;
pub mod upgrade;

pub use escape::{escape, unescape};
pub use export::{ExportReport, default_file_name, export_disabled_hosts, export_records};
pub use header::{RawHeader, sniff_csv_header, sniff_xml_header, validate_header};
pub use normalize::{NormalizedBody, normalize, normalize_body};
pub use obfuscate::{deobfuscate, obfuscate};
pub use parse::{ParsedBody, read_csv_export, read_disabled_export, read_xml_export};

use pwdex_core::{ExportFormat, Header, PwdexError};

/// Read and normalize a saved-credentials export.
///
/// Fails only on structural problems (header, producer, kind, version,
/// malformed XML). Bad individual records end up in
/// [`NormalizedBody::failures`].
pub fn decode_export(
    text: &str,
    format: ExportFormat,
) -> Result<(Header, NormalizedBody), PwdexError> {
    let (header, body) = match format {
        ExportFormat::Xml => read_xml_export(text)?,
        ExportFormat::Csv => read_csv_export(text)?,
    };
    let normalized = normalize_body(&header, body);
    Ok((header, normalized))
}
