// SPDX-FileCopyrightText: 2026 Pwdex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Raw records to canonical records.
//!
//! Steps, in order: deobfuscation, defaulting missing credentials, splitting
//! `host (realm)` hostnames, the legacy upgrade (which may fan out), and the
//! realm/formSubmitURL exclusion.

use std::sync::LazyLock;

use pwdex_core::{FormatFailure, Header, PwdexError, RawRecord, Record, SchemaVersion};
use regex::Regex;
use tracing::{debug, warn};

use crate::obfuscate::deobfuscate;
use crate::parse::ParsedBody;
use crate::upgrade::upgrade_legacy;

/// Realm folded into the hostname, e.g. `example.com:8080 (Members)`.
static HOST_WITH_REALM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(.*) \((.*)\)").expect("valid regex"));

/// Canonical records from one export body plus everything that was dropped.
#[derive(Debug, Default)]
pub struct NormalizedBody {
    pub records: Vec<Record>,
    pub failures: Vec<FormatFailure>,
}

/// Normalize one raw record. May return more than one record.
pub fn normalize(header: &Header, raw: RawRecord) -> Result<Vec<Record>, PwdexError> {
    let RawRecord {
        hostname,
        form_submit_url,
        http_realm,
        mut username,
        mut password,
        username_field,
        password_field,
    } = raw;

    let hostname = hostname.ok_or_else(|| PwdexError::Normalize {
        hostname: String::new(),
        reason: "entry has no hostname".to_string(),
    })?;

    if header.encrypted {
        let decode = |value: Option<String>, what: &str| {
            value
                .map(|v| deobfuscate(&v))
                .transpose()
                .map_err(|e| PwdexError::Normalize {
                    hostname: hostname.clone(),
                    reason: format!("{what} is not valid base64: {e}"),
                })
        };
        password = decode(password, "password")?;
        // 1.0.2 only obfuscated passwords.
        if header.schema_version != SchemaVersion::V1_0_2 {
            username = decode(username, "username")?;
        }
    }

    let mut record = Record {
        hostname,
        form_submit_url,
        http_realm,
        username: username.unwrap_or_default(),
        password: password.unwrap_or_default(),
        username_field,
        password_field,
    };

    if record.http_realm.as_deref().is_none_or(str::is_empty)
        && let Some(caps) = HOST_WITH_REALM.captures(&record.hostname)
    {
        let (host, realm) = (caps[1].to_string(), caps[2].to_string());
        record.hostname = host;
        record.http_realm = Some(realm);
    }

    let mut records = upgrade_legacy(record);
    for login in &mut records {
        if login.http_realm.is_some() {
            login.form_submit_url = None;
        }
        debug!(
            hostname = %login.hostname,
            http_realm = ?login.http_realm,
            form_submit_url = ?login.form_submit_url,
            username_field = %login.username_field,
            password_field = %login.password_field,
            "normalized record"
        );
    }
    Ok(records)
}

/// Normalize every row of a parsed body, carrying over its malformed lines.
///
/// A record that fails normalization is dropped and reported; the rest of
/// the body is still processed.
pub fn normalize_body(header: &Header, body: ParsedBody) -> NormalizedBody {
    let mut out = NormalizedBody {
        records: Vec::with_capacity(body.rows.len()),
        failures: body.malformed,
    };

    for (position, raw) in body.rows {
        let hostname = raw.hostname.clone();
        match normalize(header, raw) {
            Ok(records) => out.records.extend(records),
            Err(err) => {
                warn!(position, hostname = ?hostname, error = %err, "dropping record");
                out.failures.push(FormatFailure {
                    position,
                    hostname,
                    reason: match err {
                        PwdexError::Normalize { reason, .. } => reason,
                        other => other.to_string(),
                    },
                });
            }
        }
    }

    out.failures.sort_by_key(|f| f.position);
    out
}
