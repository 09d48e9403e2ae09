// SPDX-FileCopyrightText: 2026 Pwdex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Serialization of records and disabled hosts into export files.

use chrono::NaiveDate;
use pwdex_core::{
    DisabledHost, ExportFormat, LineEnding, PRODUCER_TAG, PwdexError, Record, RecordKind,
    SchemaVersion,
};
use tracing::{info, warn};

use crate::escape::escape;
use crate::obfuscate::obfuscate;

const CSV_COLUMNS: &str = r#""hostname","username","password","formSubmitURL","httpRealm","usernameField","passwordField""#;

/// Result of one export run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportReport {
    /// The complete file contents.
    pub text: String,
    /// Records written.
    pub count: usize,
    /// Records that could not be written.
    pub error_count: usize,
    /// Hostnames of the records that could not be written.
    pub failed: Vec<String>,
}

/// Serialize `records` to XML or CSV.
///
/// A record that fails validation is skipped and counted; the rest of the
/// batch is still written.
pub fn export_records(
    records: &[Record],
    format: ExportFormat,
    obfuscate_credentials: bool,
    line_ending: LineEnding,
) -> ExportReport {
    let lb = line_ending.as_str();
    let mut report = ExportReport::default();

    match format {
        ExportFormat::Xml => {
            report.text.push_str("<xml>");
            report.text.push_str(lb);
            report.text.push_str(&format!(
                r#"<entries ext="{PRODUCER_TAG}" extxmlversion="{}" type="{}" encrypt="{obfuscate_credentials}">"#,
                SchemaVersion::V1_1,
                RecordKind::Saved,
            ));
        }
        ExportFormat::Csv => {
            report.text.push_str(&format!(
                "# Generated by {PRODUCER_TAG}; Export format {}; Encrypted: {obfuscate_credentials}",
                SchemaVersion::V1_1,
            ));
            report.text.push_str(lb);
            report.text.push_str(CSV_COLUMNS);
        }
    }
    report.text.push_str(lb);

    for record in records {
        match format_record(record, format, obfuscate_credentials) {
            Ok(line) => {
                report.text.push_str(&line);
                report.text.push_str(lb);
                report.count += 1;
            }
            Err(err) => {
                warn!(hostname = %record.hostname, error = %err, "skipping record on export");
                report.error_count += 1;
                report.failed.push(record.hostname.clone());
            }
        }
    }

    if format == ExportFormat::Xml {
        report.text.push_str("</entries>");
        report.text.push_str(lb);
        report.text.push_str("</xml>");
    }

    info!(
        format = %format,
        count = report.count,
        errors = report.error_count,
        "export generated"
    );
    report
}

fn format_record(
    record: &Record,
    format: ExportFormat,
    obfuscate_credentials: bool,
) -> Result<String, PwdexError> {
    record.validate()?;

    let (username, password) = if obfuscate_credentials {
        (obfuscate(&record.username), obfuscate(&record.password))
    } else {
        (record.username.clone(), record.password.clone())
    };
    let optional = |v: &Option<String>| v.as_deref().map(escape).unwrap_or_default();

    let fields = [
        escape(&record.hostname),
        escape(&username),
        escape(&password),
        optional(&record.form_submit_url),
        optional(&record.http_realm),
        escape(&record.username_field),
        escape(&record.password_field),
    ];

    Ok(match format {
        ExportFormat::Xml => {
            let [host, user, pass, submit, realm, user_field, pass_field] =
                fields.map(|value| xml_attribute(&value));
            let (host, user, pass) = (host?, user?, pass?);
            let (submit, realm, user_field, pass_field) = (submit?, realm?, user_field?, pass_field?);
            format!(
                r#"<entry host="{host}" user="{user}" password="{pass}" formSubmitURL="{submit}" httpRealm="{realm}" userFieldName="{user_field}" passFieldName="{pass_field}"/>"#
            )
        }
        ExportFormat::Csv => {
            let [host, user, pass, submit, realm, user_field, pass_field] = fields;
            format!(
                r#""{host}","{user}","{pass}","{submit}","{realm}","{user_field}","{pass_field}""#
            )
        }
    })
}

/// Prepare an already escaped value for an XML attribute.
///
/// Parsers normalize literal tabs in attribute values to spaces, so tabs are
/// written as character references. Characters outside the XML 1.0 `Char`
/// production cannot be written at all.
fn xml_attribute(value: &str) -> Result<String, PwdexError> {
    if let Some(c) = value.chars().find(|c| !is_xml_char(*c)) {
        return Err(PwdexError::InvalidRecord(format!(
            "contains U+{:04X}, which XML cannot represent",
            u32::from(c)
        )));
    }
    Ok(value.replace('\t', "&#9;"))
}

fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..
    )
}

/// Serialize disabled hosts into the `rejected` XML envelope.
///
/// A host XML cannot carry is skipped and counted like a failed record.
pub fn export_disabled_hosts(hosts: &[DisabledHost], line_ending: LineEnding) -> ExportReport {
    let lb = line_ending.as_str();
    let mut report = ExportReport {
        text: String::from("<xml>"),
        ..ExportReport::default()
    };
    report.text.push_str(lb);
    report.text.push_str(&format!(
        r#"<entries ext="{PRODUCER_TAG}" extxmlversion="{}" type="{}">"#,
        SchemaVersion::V1_0_2,
        RecordKind::Rejected,
    ));
    report.text.push_str(lb);

    for host in hosts {
        match xml_attribute(&escape(&host.hostname)) {
            Ok(value) => {
                report.text.push_str(&format!(r#"<entry host="{value}"/>"#));
                report.text.push_str(lb);
                report.count += 1;
            }
            Err(err) => {
                warn!(hostname = %host.hostname, error = %err, "skipping disabled host on export");
                report.error_count += 1;
                report.failed.push(host.hostname.clone());
            }
        }
    }

    report.text.push_str("</entries>");
    report.text.push_str(lb);
    report.text.push_str("</xml>");

    info!(
        count = report.count,
        errors = report.error_count,
        "disabled hosts export generated"
    );
    report
}

/// Suggested file name for an export written on `date`.
pub fn default_file_name(kind: RecordKind, format: ExportFormat, date: NaiveDate) -> String {
    let date = date.format("%Y-%m-%d");
    match kind {
        RecordKind::Saved => format!("password-export-{date}.{}", format.extension()),
        RecordKind::Rejected => format!("disabled-export-{date}.xml"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> Vec<Record> {
        vec![
            Record {
                username_field: "user".into(),
                password_field: "pass".into(),
                ..Record::form("https://example.com", "https://example.com", "alice", "p&w\"d")
            },
            Record::auth("https://intranet.example", "Staff <only>", "bob", "hunter2"),
        ]
    }

    #[test]
    fn xml_layout() {
        let report = export_records(&records(), ExportFormat::Xml, false, LineEnding::Lf);
        let expected = concat!(
            "<xml>\n",
            r#"<entries ext="Password Exporter" extxmlversion="1.1" type="saved" encrypt="false">"#, "\n",
            r#"<entry host="https://example.com" user="alice" password="p%26w%22d" formSubmitURL="https://example.com" httpRealm="" userFieldName="user" passFieldName="pass"/>"#, "\n",
            r#"<entry host="https://intranet.example" user="bob" password="hunter2" formSubmitURL="" httpRealm="Staff %3Conly%3E" userFieldName="" passFieldName=""/>"#, "\n",
            "</entries>\n",
            "</xml>",
        );
        assert_eq!(report.text, expected);
        assert_eq!(report.count, 2);
        assert_eq!(report.error_count, 0);
    }

    #[test]
    fn csv_layout_with_crlf() {
        let report = export_records(&records()[..1], ExportFormat::Csv, false, LineEnding::Crlf);
        let expected = concat!(
            "# Generated by Password Exporter; Export format 1.1; Encrypted: false\r\n",
            r#""hostname","username","password","formSubmitURL","httpRealm","usernameField","passwordField""#, "\r\n",
            r#""https://example.com","alice","p%26w%22d","https://example.com","","user","pass""#, "\r\n",
        );
        assert_eq!(report.text, expected);
    }

    #[test]
    fn obfuscation_applies_to_credentials_only() {
        let report = export_records(&records()[1..], ExportFormat::Csv, true, LineEnding::Lf);
        assert!(report.text.starts_with(
            "# Generated by Password Exporter; Export format 1.1; Encrypted: true\n"
        ));
        assert!(report.text.contains(r#""https://intranet.example","Ym9i","aHVudGVyMg==","#));
    }

    #[test]
    fn invalid_record_is_counted_and_skipped() {
        let mut batch = records();
        batch.insert(1, Record::form("https://bad.example", "", "multi\nline", "pw"));

        let report = export_records(&batch, ExportFormat::Xml, false, LineEnding::Lf);
        assert_eq!(report.count, 2);
        assert_eq!(report.error_count, 1);
        assert_eq!(report.failed, vec!["https://bad.example".to_string()]);
        assert!(!report.text.contains("bad.example"));
    }

    #[test]
    fn empty_store_still_writes_envelope() {
        let report = export_records(&[], ExportFormat::Xml, false, LineEnding::Lf);
        assert!(report.text.contains("<entries "));
        assert!(report.text.ends_with("</entries>\n</xml>"));
    }

    #[test]
    fn disabled_hosts_layout() {
        let hosts = vec![
            DisabledHost::new("https://a.example"),
            DisabledHost::new("https://b.example"),
        ];
        let xml = export_disabled_hosts(&hosts, LineEnding::Lf).text;
        let expected = concat!(
            "<xml>\n",
            r#"<entries ext="Password Exporter" extxmlversion="1.0.2" type="rejected">"#, "\n",
            r#"<entry host="https://a.example"/>"#, "\n",
            r#"<entry host="https://b.example"/>"#, "\n",
            "</entries>\n",
            "</xml>",
        );
        assert_eq!(xml, expected);
    }

    #[test]
    fn xml_attribute_encodes_tabs_and_rejects_non_xml() {
        assert_eq!(xml_attribute("a\tb").unwrap(), "a&#9;b");
        assert_eq!(xml_attribute("plain ☃").unwrap(), "plain ☃");
        assert!(matches!(
            xml_attribute("a\u{1}b"),
            Err(PwdexError::InvalidRecord(ref reason)) if reason.contains("U+0001")
        ));
        assert!(xml_attribute("\u{FFFE}").is_err());
        assert!(xml_attribute("\u{1F600}").is_ok());
    }

    #[test]
    fn disabled_host_xml_cannot_carry_is_skipped() {
        let hosts = vec![
            DisabledHost::new("https://a\u{7}.example"),
            DisabledHost::new("https://b.example"),
        ];
        let report = export_disabled_hosts(&hosts, LineEnding::Lf);
        assert_eq!(report.count, 1);
        assert_eq!(report.error_count, 1);
        assert_eq!(report.failed, vec!["https://a\u{7}.example".to_string()]);
        assert!(report.text.contains(r#"<entry host="https://b.example"/>"#));
    }

    #[test]
    fn default_file_names() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
        assert_eq!(
            default_file_name(RecordKind::Saved, ExportFormat::Csv, date),
            "password-export-2026-03-07.csv"
        );
        assert_eq!(
            default_file_name(RecordKind::Saved, ExportFormat::Xml, date),
            "password-export-2026-03-07.xml"
        );
        assert_eq!(
            default_file_name(RecordKind::Rejected, ExportFormat::Csv, date),
            "disabled-export-2026-03-07.xml"
        );
    }
}
