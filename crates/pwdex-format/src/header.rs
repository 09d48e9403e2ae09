// SPDX-FileCopyrightText: 2026 Pwdex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Export header extraction and the validation gate applied before any body
//! parsing.

use std::sync::LazyLock;

use pwdex_core::{Header, PRODUCER_TAG, PwdexError, RecordKind, SchemaVersion};
use regex::Regex;
use tracing::debug;

/// Comment header written by schema 1.1 and later.
static CSV_COMMENT_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)# Generated by (.+); Export format (.{3,6}); Encrypted: (true|false)")
        .expect("valid regex")
});

/// First-line header written by schema 1.0.2 and 1.0.4.
static CSV_LEGACY_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(.+?),(.{3,6}),(true|false)").expect("valid regex"));

/// Header fields exactly as found in the file, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawHeader {
    pub producer: String,
    pub kind: String,
    pub version: String,
    pub encrypted: bool,
}

/// Read the header of a CSV export.
///
/// CSV files only ever hold saved credentials, so the kind is always `saved`.
pub fn sniff_csv_header(text: &str) -> Result<RawHeader, PwdexError> {
    let caps = CSV_COMMENT_HEADER
        .captures(text)
        .or_else(|| CSV_LEGACY_HEADER.captures(text))
        .ok_or_else(|| {
            PwdexError::Header("no Password Exporter CSV header line found".to_string())
        })?;

    Ok(RawHeader {
        producer: caps[1].to_string(),
        kind: RecordKind::Saved.to_string(),
        version: caps[2].to_string(),
        encrypted: caps[3].eq_ignore_ascii_case("true"),
    })
}

/// Read the header attributes off the first `<entries>` element.
pub fn sniff_xml_header(doc: &roxmltree::Document<'_>) -> Result<RawHeader, PwdexError> {
    let entries = doc
        .descendants()
        .find(|n| n.has_tag_name("entries"))
        .ok_or(PwdexError::MissingHeader)?;

    let attr = |name: &str| entries.attribute(name).unwrap_or_default().to_string();
    Ok(RawHeader {
        producer: attr("ext"),
        kind: attr("type"),
        version: attr("extxmlversion"),
        encrypted: entries
            .attribute("encrypt")
            .is_some_and(|v| v.eq_ignore_ascii_case("true")),
    })
}

/// Parse an XML export into a document, mapping parser errors.
pub fn parse_document(text: &str) -> Result<roxmltree::Document<'_>, PwdexError> {
    roxmltree::Document::parse(text).map_err(|e| PwdexError::MalformedDocument {
        detail: e.to_string(),
    })
}

/// Check producer, kind and version, in that order.
pub fn validate_header(raw: RawHeader, expected: RecordKind) -> Result<Header, PwdexError> {
    if raw.producer != PRODUCER_TAG {
        return Err(PwdexError::UnrecognizedProducer {
            found: raw.producer,
        });
    }

    let kind = raw.kind.parse::<RecordKind>().ok();
    if kind != Some(expected) {
        return Err(PwdexError::WrongFileKind {
            expected: expected.to_string(),
            found: raw.kind,
        });
    }

    let schema_version = raw.version.parse::<SchemaVersion>()?;
    debug!(
        version = %schema_version,
        kind = %expected,
        encrypted = raw.encrypted,
        "export header accepted"
    );

    Ok(Header {
        producer_tag: raw.producer,
        record_kind: expected,
        schema_version,
        encrypted: raw.encrypted,
    })
}
