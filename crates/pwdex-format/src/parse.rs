// SPDX-FileCopyrightText: 2026 Pwdex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-format, per-version body parsing into raw records.
//!
//! Every value is percent-decoded here. Base64 deobfuscation happens later,
//! in the normalizer.

use pwdex_core::{DisabledHost, FormatFailure, Header, PwdexError, RawRecord, RecordKind};
use tracing::{debug, warn};

use crate::escape::unescape;
use crate::header::{parse_document, sniff_csv_header, sniff_xml_header, validate_header};

const LEGACY_CSV_FIELDS: usize = 5;
const CSV_FIELDS: usize = 7;

/// Raw records from one export body, keyed by 1-based entry or line position.
#[derive(Debug, Default)]
pub struct ParsedBody {
    pub rows: Vec<(usize, RawRecord)>,
    pub malformed: Vec<FormatFailure>,
}

/// Validate the header of a saved-credentials XML export and parse its entries.
pub fn read_xml_export(text: &str) -> Result<(Header, ParsedBody), PwdexError> {
    let doc = parse_document(text)?;
    let header = validate_header(sniff_xml_header(&doc)?, RecordKind::Saved)?;
    let body = parse_xml_body(&doc, &header);
    Ok((header, body))
}

/// Validate the header of a saved-credentials CSV export and parse its lines.
pub fn read_csv_export(text: &str) -> Result<(Header, ParsedBody), PwdexError> {
    let header = validate_header(sniff_csv_header(text)?, RecordKind::Saved)?;
    let body = parse_csv_body(text, &header);
    Ok((header, body))
}

/// Validate a disabled-hosts XML export and return its hosts.
///
/// Entries without a `host` attribute are skipped.
pub fn read_disabled_export(text: &str) -> Result<Vec<DisabledHost>, PwdexError> {
    let doc = parse_document(text)?;
    validate_header(sniff_xml_header(&doc)?, RecordKind::Rejected)?;

    Ok(doc
        .descendants()
        .filter(|n| n.has_tag_name("entry"))
        .filter_map(|n| n.attribute("host"))
        .map(|host| DisabledHost::new(unescape(host)))
        .collect())
}

/// One raw record per `<entry>` element, in document order.
pub fn parse_xml_body(doc: &roxmltree::Document<'_>, header: &Header) -> ParsedBody {
    // Before 1.1 a missing formSubmitURL meant an empty one.
    let missing_submit_url = header.schema_version.is_legacy().then(String::new);

    let rows = doc
        .descendants()
        .filter(|n| n.has_tag_name("entry"))
        .enumerate()
        .map(|(idx, entry)| {
            let decoded = |name: &str| entry.attribute(name).map(unescape);
            let raw = RawRecord {
                hostname: decoded("host"),
                form_submit_url: decoded("formSubmitURL").or_else(|| missing_submit_url.clone()),
                http_realm: decoded("httpRealm").filter(|r| !r.is_empty()),
                username: decoded("user"),
                password: decoded("password"),
                username_field: decoded("userFieldName").unwrap_or_default(),
                password_field: decoded("passFieldName").unwrap_or_default(),
            };
            (idx + 1, raw)
        })
        .collect::<Vec<_>>();

    debug!(entries = rows.len(), "parsed XML export body");
    ParsedBody {
        rows,
        malformed: Vec::new(),
    }
}

/// Split a CSV export into lines and parse each record line.
///
/// Header lines are skipped by count: one for 1.0.x, two for 1.1. Blank
/// lines are ignored.
pub fn parse_csv_body(text: &str, header: &Header) -> ParsedBody {
    let legacy = header.schema_version.is_legacy();
    let skip = if legacy { 1 } else { 2 };

    let mut body = ParsedBody::default();
    for (idx, line) in split_lines(text).into_iter().enumerate().skip(skip) {
        if line.trim().is_empty() {
            continue;
        }
        let position = idx + 1;
        let parsed = if legacy {
            parse_legacy_csv_line(line)
        } else {
            parse_csv_line(line)
        };
        match parsed {
            Ok(raw) => body.rows.push((position, raw)),
            Err(reason) => {
                warn!(line = position, %reason, "skipping malformed CSV line");
                body.malformed.push(FormatFailure {
                    position,
                    hostname: None,
                    reason,
                });
            }
        }
    }

    debug!(
        rows = body.rows.len(),
        malformed = body.malformed.len(),
        "parsed CSV export body"
    );
    body
}

/// Split on `\r\n` if present, else `\r`, else `\n`.
fn split_lines(text: &str) -> Vec<&str> {
    if text.contains("\r\n") {
        text.split("\r\n").collect()
    } else if text.contains('\r') {
        text.split('\r').collect()
    } else {
        text.split('\n').collect()
    }
}

/// `hostname,username,password,usernameField,passwordField`, unquoted.
fn parse_legacy_csv_line(line: &str) -> Result<RawRecord, String> {
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() != LEGACY_CSV_FIELDS {
        return Err(format!(
            "expected {LEGACY_CSV_FIELDS} fields, found {}",
            fields.len()
        ));
    }

    Ok(RawRecord {
        hostname: (!fields[0].is_empty()).then(|| unescape(fields[0])),
        form_submit_url: Some(String::new()),
        http_realm: None,
        username: Some(unescape(fields[1])),
        password: Some(unescape(fields[2])),
        username_field: unescape(fields[3]),
        password_field: unescape(fields[4]),
    })
}

/// Seven quoted fields joined by `,`.
///
/// The line is split on the literal `","`. A value containing that sequence
/// after escaping splits in the wrong place and the line is rejected.
fn parse_csv_line(line: &str) -> Result<RawRecord, String> {
    let mut fields: Vec<&str> = line.split("\",\"").collect();
    if fields.len() != CSV_FIELDS {
        return Err(format!(
            "expected {CSV_FIELDS} quoted fields, found {}",
            fields.len()
        ));
    }

    // An empty hostname leaves only the opening quote.
    let hostname = (fields[0] != "\"")
        .then(|| unescape(fields[0].strip_prefix('"').unwrap_or(fields[0])));
    fields[6] = fields[6].strip_suffix('"').unwrap_or(fields[6]);
    let non_empty = |s: &str| (!s.is_empty()).then(|| unescape(s));

    Ok(RawRecord {
        hostname,
        form_submit_url: non_empty(fields[3]),
        http_realm: non_empty(fields[4]),
        username: Some(unescape(fields[1])),
        password: Some(unescape(fields[2])),
        username_field: unescape(fields[5]),
        password_field: unescape(fields[6]),
    })
}
