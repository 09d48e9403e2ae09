// SPDX-FileCopyrightText: 2026 Pwdex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Export-then-import behaviour across formats and historical schema variants.

use pwdex_core::{ExportFormat, LineEnding, PwdexError, Record, SchemaVersion};
use pwdex_format::{decode_export, export_records};

fn sample() -> Vec<Record> {
    vec![
        Record {
            username_field: "login".into(),
            password_field: "pwd".into(),
            ..Record::form(
                "https://shop.example",
                "https://shop.example",
                "alice",
                "s3cr%t<&>\"",
            )
        },
        Record::form("https://mail.example", "https://auth.mail.example", "bob", "pw"),
        Record::auth("https://intranet.example", "Staff Only", "carol", "pass word"),
        Record::auth("http://router.local:8080", "Router (admin)", "admin", "admin"),
        Record {
            username: "dävid".into(),
            password: "naïve ☃".into(),
            ..Record::form("https://unicode.example", "https://unicode.example", "", "")
        },
    ]
}

#[test]
fn round_trip_all_formats_and_obfuscation() {
    for format in [ExportFormat::Xml, ExportFormat::Csv] {
        for obfuscate in [false, true] {
            for line_ending in [LineEnding::Lf, LineEnding::Crlf] {
                let report = export_records(&sample(), format, obfuscate, line_ending);
                assert_eq!(report.count, 5);

                let (header, body) = decode_export(&report.text, format).unwrap();
                assert_eq!(header.schema_version, SchemaVersion::V1_1);
                assert_eq!(header.encrypted, obfuscate);
                assert!(body.failures.is_empty(), "{format} {obfuscate}: {:?}", body.failures);
                assert_eq!(body.records, sample(), "{format} obfuscate={obfuscate}");
            }
        }
    }
}

#[test]
fn realm_records_never_keep_submit_url() {
    for format in [ExportFormat::Xml, ExportFormat::Csv] {
        let report = export_records(&sample(), format, false, LineEnding::Lf);
        let (_, body) = decode_export(&report.text, format).unwrap();
        for record in body.records {
            if record.http_realm.is_some() {
                assert_eq!(record.form_submit_url, None);
            }
        }
    }
}

/// A form record without an action URL comes back with an empty one from
/// XML but with none from CSV; both layouts write it as an empty value.
#[test]
fn missing_submit_url_is_not_preserved() {
    let record = Record {
        hostname: "https://example.com".into(),
        username: "a".into(),
        password: "b".into(),
        ..Default::default()
    };

    let xml = export_records(std::slice::from_ref(&record), ExportFormat::Xml, false, LineEnding::Lf);
    let (_, body) = decode_export(&xml.text, ExportFormat::Xml).unwrap();
    assert_eq!(body.records[0].form_submit_url.as_deref(), Some(""));

    let csv = export_records(&[record], ExportFormat::Csv, false, LineEnding::Lf);
    let (_, body) = decode_export(&csv.text, ExportFormat::Csv).unwrap();
    assert_eq!(body.records[0].form_submit_url, None);
}

#[test]
fn legacy_csv_1_0_2() {
    let text = "Password Exporter,1.0.2,false\nexample.com,alice,secret,userfield,passfield\n";
    let (header, body) = decode_export(text, ExportFormat::Csv).unwrap();
    assert_eq!(header.schema_version, SchemaVersion::V1_0_2);
    assert_eq!(
        body.records,
        vec![Record {
            hostname: "example.com".into(),
            form_submit_url: Some(String::new()),
            http_realm: None,
            username: "alice".into(),
            password: "secret".into(),
            username_field: "userfield".into(),
            password_field: "passfield".into(),
        }]
    );
}

#[test]
fn legacy_csv_1_0_2_encrypted_password_only() {
    let text = "Password Exporter,1.0.2,true\nexample.com,alice,c2VjcmV0,u,p\n";
    let (_, body) = decode_export(text, ExportFormat::Csv).unwrap();
    assert_eq!(body.records[0].username, "alice");
    assert_eq!(body.records[0].password, "secret");
}

#[test]
fn legacy_csv_1_0_4_encrypts_usernames_too() {
    let text = "Password Exporter,1.0.4,true\nexample.com,YWxpY2U=,c2VjcmV0,u,p\n";
    let (_, body) = decode_export(text, ExportFormat::Csv).unwrap();
    assert_eq!(body.records[0].username, "alice");
    assert_eq!(body.records[0].password, "secret");
}

#[test]
fn legacy_xml_http_auth_fans_out() {
    let text = r#"<xml>
<entries ext="Password Exporter" extxmlversion="1.0.4" type="saved" encrypt="false">
<entry host="example.com:8080 (Members)" user="alice" password="secret"/>
<entry host="example.com:443" user="bob" password="pw" httpRealm="Staff"/>
</entries>
</xml>"#;
    let (_, body) = decode_export(text, ExportFormat::Xml).unwrap();
    let hosts: Vec<(&str, Option<&str>)> = body
        .records
        .iter()
        .map(|r| (r.hostname.as_str(), r.http_realm.as_deref()))
        .collect();
    assert_eq!(
        hosts,
        vec![
            ("http://example.com:8080", Some("Members")),
            ("https://example.com:8080", Some("Members")),
            ("https://example.com", Some("Staff")),
        ]
    );
    assert!(body.records.iter().all(|r| r.form_submit_url.is_none()));
}

#[test]
fn rejected_file_is_wrong_kind() {
    let text = r#"<xml><entries ext="Password Exporter" extxmlversion="1.0.2" type="rejected"><entry host="a"/></entries></xml>"#;
    let err = decode_export(text, ExportFormat::Xml).unwrap_err();
    assert!(matches!(err, PwdexError::WrongFileKind { .. }));
    assert!(err.is_fatal_input());
}

#[test]
fn future_version_is_rejected() {
    let text = r#"<xml><entries ext="Password Exporter" extxmlversion="9.9" type="saved" encrypt="false"><entry host="https://a.example" user="a" password="b"/></entries></xml>"#;
    let err = decode_export(text, ExportFormat::Xml).unwrap_err();
    assert!(matches!(err, PwdexError::UnsupportedVersion { ref version } if version == "9.9"));
}

#[test]
fn csv_future_version_is_rejected() {
    let text = "# Generated by Password Exporter; Export format 2.0; Encrypted: false\n";
    let err = decode_export(text, ExportFormat::Csv).unwrap_err();
    assert!(matches!(err, PwdexError::UnsupportedVersion { .. }));
}

#[test]
fn unrelated_xml_is_missing_header() {
    let err = decode_export("<html><body/></html>", ExportFormat::Xml).unwrap_err();
    assert!(matches!(err, PwdexError::MissingHeader));
}

#[test]
fn bad_rows_do_not_stop_the_batch() {
    let text = concat!(
        "# Generated by Password Exporter; Export format 1.1; Encrypted: true\n",
        r#""hostname","username","password","formSubmitURL","httpRealm","usernameField","passwordField""#, "\n",
        r#""https://a.example","YQ==","Yg==","https://a.example","","","""#, "\n",
        r#""https://b.example","YQ==","!!!","https://b.example","","","""#, "\n",
        r#""https://c.example","YQ==","Yw==""#, "\n",
        r#""https://d.example","ZA==","ZA==","","Realm","","""#, "\n",
    );
    let (_, body) = decode_export(text, ExportFormat::Csv).unwrap();
    let hosts: Vec<&str> = body.records.iter().map(|r| r.hostname.as_str()).collect();
    assert_eq!(hosts, vec!["https://a.example", "https://d.example"]);

    assert_eq!(body.failures.len(), 2);
    assert_eq!(body.failures[0].position, 4);
    assert_eq!(body.failures[0].hostname.as_deref(), Some("https://b.example"));
    assert_eq!(body.failures[1].position, 5);
}

#[test]
fn tabs_survive_xml_round_trip() {
    let record = Record {
        username_field: "user\tname".into(),
        ..Record::form("https://tab.example", "https://tab.example", "al\tice", "pa\tss")
    };

    let report = export_records(std::slice::from_ref(&record), ExportFormat::Xml, false, LineEnding::Lf);
    assert_eq!(report.count, 1);
    assert!(report.text.contains(r#"password="pa&#9;ss""#));

    let (_, body) = decode_export(&report.text, ExportFormat::Xml).unwrap();
    assert_eq!(body.records, vec![record]);
}

#[test]
fn xml_forbidden_character_fails_only_its_record() {
    let good = Record::form("https://good.example", "https://good.example", "alice", "pw");
    let bad = Record::form("https://bad.example", "https://bad.example", "bob", "p\u{1}w");

    let report = export_records(&[good.clone(), bad], ExportFormat::Xml, false, LineEnding::Lf);
    assert_eq!(report.count, 1);
    assert_eq!(report.error_count, 1);
    assert_eq!(report.failed, vec!["https://bad.example".to_string()]);

    let (_, body) = decode_export(&report.text, ExportFormat::Xml).unwrap();
    assert_eq!(body.records, vec![good]);
}

#[test]
fn control_characters_are_fine_in_csv() {
    let record = Record::form("https://ctl.example", "https://ctl.example", "bob", "p\u{1}w\tx");

    let report = export_records(std::slice::from_ref(&record), ExportFormat::Csv, false, LineEnding::Lf);
    assert_eq!(report.error_count, 0);

    let (_, body) = decode_export(&report.text, ExportFormat::Csv).unwrap();
    assert_eq!(body.records, vec![record]);
}

#[test]
fn obfuscated_credentials_hide_forbidden_characters() {
    let record = Record::form("https://ob.example", "https://ob.example", "bob", "p\u{1}w");

    let report = export_records(std::slice::from_ref(&record), ExportFormat::Xml, true, LineEnding::Lf);
    assert_eq!(report.count, 1);

    let (_, body) = decode_export(&report.text, ExportFormat::Xml).unwrap();
    assert_eq!(body.records, vec![record]);
}
