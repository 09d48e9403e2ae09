// SPDX-FileCopyrightText: 2026 Pwdex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Whole-file imports into in-memory and SQLite stores.

use std::time::Duration;

use pwdex_config::model::ForeignConfig;
use pwdex_core::{CredentialStore, ExportFormat, LineEnding, PwdexError, RecordKind};
use pwdex_foreign::{PlaintextDecryptor, RetryPolicy};
use pwdex_import::{
    ImportBatch, ImportObserver, Importer, NoopObserver, Progress, export_disabled_from_store,
    export_store,
};
use pwdex_test_utils::fixtures::{
    csv_export, disabled_export, foreign_auth_row, foreign_form_row, sample_records, xml_export,
};
use pwdex_test_utils::{FlakyRowSource, MemoryStore, TestHarness};
use tokio_util::sync::CancellationToken;

#[derive(Default)]
struct Counting {
    progress: usize,
    completions: usize,
    last: Option<Progress>,
}

impl ImportObserver for Counting {
    fn on_progress(&mut self, progress: Progress) {
        self.progress += 1;
        self.last = Some(progress);
    }

    fn on_complete(&mut self, _batch: &ImportBatch) {
        self.completions += 1;
    }
}

#[test]
fn export_then_import_into_a_fresh_store() {
    let source = MemoryStore::with_records(sample_records());
    for format in [ExportFormat::Xml, ExportFormat::Csv] {
        for obfuscate in [false, true] {
            let export = export_store(&source, format, obfuscate, LineEnding::Crlf).unwrap();
            assert_eq!(export.count, 5);

            let target = MemoryStore::new();
            let report = Importer::new(&target, CancellationToken::new())
                .import_text(&export.text, format, &mut NoopObserver)
                .unwrap();

            assert_eq!(report.header.encrypted, obfuscate);
            assert_eq!(report.batch.inserted_count, 5);
            assert!(!report.has_failures());
            assert_eq!(target.records(), sample_records(), "{format} obfuscate={obfuscate}");
        }
    }
}

#[test]
fn partial_failure_batch_reports_once() {
    let records = sample_records();
    let text = export_store(
        &MemoryStore::with_records(records.clone()),
        ExportFormat::Xml,
        false,
        LineEnding::Lf,
    )
    .unwrap()
    .text;

    let store = MemoryStore::new();
    store.fail_inserts_for(records[2].hostname.clone());
    let mut observer = Counting::default();

    let report = Importer::new(&store, CancellationToken::new())
        .import_text(&text, ExportFormat::Xml, &mut observer)
        .unwrap();

    assert_eq!(report.batch.inserted_count, 4);
    assert_eq!(report.batch.failures.len(), 1);
    assert_eq!(report.batch.failures[0].hostname, records[2].hostname);
    assert_eq!(observer.completions, 1);
    assert_eq!(observer.last.map(|p| (p.processed, p.total)), Some((5, 5)));
}

#[test]
fn wrong_kind_and_future_version_leave_store_untouched() {
    let store = MemoryStore::new();
    let importer = Importer::new(&store, CancellationToken::new());
    let entry = r#"<entry host="https://a.example" user="a" password="b" formSubmitURL="https://a.example"/>"#;

    let err = importer
        .import_text(&xml_export("1.1", "rejected", &[entry]), ExportFormat::Xml, &mut NoopObserver)
        .unwrap_err();
    assert!(matches!(err, PwdexError::WrongFileKind { .. }));

    let err = importer
        .import_text(&xml_export("9.9", "saved", &[entry]), ExportFormat::Xml, &mut NoopObserver)
        .unwrap_err();
    assert!(matches!(err, PwdexError::UnsupportedVersion { .. }));

    assert_eq!(store.insert_attempts(), 0);
}

#[test]
fn legacy_csv_import() {
    let store = MemoryStore::new();
    let report = Importer::new(&store, CancellationToken::new())
        .import_text(
            "Password Exporter,1.0.2,false\nexample.com,alice,secret,userfield,passfield\n",
            ExportFormat::Csv,
            &mut NoopObserver,
        )
        .unwrap();

    assert_eq!(report.batch.inserted_count, 1);
    let stored = &store.records()[0];
    assert_eq!(stored.hostname, "example.com");
    assert_eq!(stored.form_submit_url.as_deref(), Some(""));
    assert_eq!(stored.http_realm, None);
    assert_eq!(stored.username_field, "userfield");
}

#[test]
fn malformed_rows_are_reported_alongside_inserts() {
    let store = MemoryStore::new();
    let text = csv_export(
        false,
        &[
            r#""https://a.example","a","b","https://a.example","","","""#,
            r#""https://b.example","only three""#,
            r#""https://c.example","c","","https://c.example","","","""#,
        ],
    );
    let report = Importer::new(&store, CancellationToken::new())
        .import_text(&text, ExportFormat::Csv, &mut NoopObserver)
        .unwrap();

    assert_eq!(report.format_failures.len(), 1);
    assert_eq!(report.format_failures[0].position, 4);
    // The empty password is only rejected by the store.
    assert_eq!(report.batch.inserted_count, 1);
    assert_eq!(report.batch.failures.len(), 1);
    assert_eq!(report.batch.failures[0].hostname, "https://c.example");
}

#[test]
fn cancelled_import_inserts_nothing() {
    let store = MemoryStore::new();
    let token = CancellationToken::new();
    token.cancel();
    let text = csv_export(false, &[r#""https://a.example","a","b","https://a.example","","","""#]);

    let report = Importer::new(&store, token)
        .import_text(&text, ExportFormat::Csv, &mut NoopObserver)
        .unwrap();

    assert!(report.batch.cancelled);
    assert_eq!(report.batch.inserted_count, 0);
    assert!(store.records().is_empty());
}

#[test]
fn foreign_import_retries_then_inserts() {
    let store = MemoryStore::new();
    let source = FlakyRowSource::new(
        2,
        vec![
            foreign_form_row("https://a.example/login", "https://a.example/post", "alice", "pw"),
            foreign_auth_row("https://b.example", "Staff", "bob", "pw2"),
        ],
    );
    let policy = RetryPolicy {
        attempts: 10,
        interval: Duration::from_millis(1),
    };

    let report = Importer::new(&store, CancellationToken::new())
        .import_foreign(&source, policy, "Chrome passwords", &PlaintextDecryptor, &mut NoopObserver)
        .unwrap();

    assert_eq!(source.attempts().len(), 3);
    assert_eq!(report.header.record_kind, RecordKind::Saved);
    assert!(!report.header.encrypted);
    assert_eq!(report.batch.inserted_count, 2);
    let stored = store.records();
    assert_eq!(stored[0].form_submit_url.as_deref(), Some("https://a.example"));
    assert_eq!(stored[1].http_realm.as_deref(), Some("Staff"));
    assert_eq!(stored[1].form_submit_url, None);
}

#[test]
fn foreign_read_exhaustion_is_fatal() {
    let store = MemoryStore::new();
    let source = FlakyRowSource::always_failing();
    let policy = RetryPolicy {
        attempts: 10,
        interval: Duration::from_millis(1),
    };

    let err = Importer::new(&store, CancellationToken::new())
        .import_foreign(&source, policy, "Chrome passwords", &PlaintextDecryptor, &mut NoopObserver)
        .unwrap_err();

    assert!(matches!(err, PwdexError::ForeignReadExhausted { attempts: 10, .. }));
    assert_eq!(source.attempts().len(), 10);
    assert_eq!(store.insert_attempts(), 0);
}

#[test]
fn import_path_routes_files_and_login_data() {
    let harness = TestHarness::new().unwrap();
    let importer = Importer::new(&harness.store, CancellationToken::new());
    let foreign = ForeignConfig::default();

    let csv = harness
        .write_file(
            "passwords.csv",
            &csv_export(false, &[r#""https://a.example","a","b","https://a.example","","","""#]),
        )
        .unwrap();
    let report = importer
        .import_path(&csv, &foreign, &PlaintextDecryptor, &mut NoopObserver)
        .unwrap();
    assert_eq!(report.batch.inserted_count, 1);

    let login_data = harness
        .write_login_data(&[foreign_form_row(
            "https://z.example/",
            "https://z.example/submit",
            "zed",
            "pw",
        )])
        .unwrap();
    let report = importer
        .import_path(&login_data, &foreign, &PlaintextDecryptor, &mut NoopObserver)
        .unwrap();
    assert_eq!(report.batch.inserted_count, 1);

    let hosts: Vec<String> = harness
        .store
        .list_all()
        .unwrap()
        .into_iter()
        .map(|r| r.hostname)
        .collect();
    assert_eq!(hosts, vec!["https://a.example", "https://z.example"]);
}

#[test]
fn duplicate_import_into_sqlite_fails_per_record() {
    let harness = TestHarness::new().unwrap();
    let importer = Importer::new(&harness.store, CancellationToken::new());
    let text = export_store(
        &MemoryStore::with_records(sample_records()),
        ExportFormat::Csv,
        true,
        LineEnding::Lf,
    )
    .unwrap()
    .text;

    let first = importer.import_text(&text, ExportFormat::Csv, &mut NoopObserver).unwrap();
    let second = importer.import_text(&text, ExportFormat::Csv, &mut NoopObserver).unwrap();

    assert_eq!(first.batch.inserted_count, 5);
    assert_eq!(second.batch.inserted_count, 0);
    assert_eq!(second.batch.failures.len(), 5);
    assert!(second.batch.failures.iter().all(|f| f.reason == "This login already exists."));
}

#[test]
fn disabled_hosts_round_trip_through_sqlite() {
    let harness = TestHarness::new().unwrap();
    let importer = Importer::new(&harness.store, CancellationToken::new());
    let path = harness
        .write_file(
            "disabled.xml",
            &disabled_export(&["https://a.example", "https://b.example%20x"]),
        )
        .unwrap();

    let report = importer.import_disabled_path(&path).unwrap();
    assert_eq!(report.imported_count, 2);

    let export = export_disabled_from_store(&harness.store, LineEnding::Lf).unwrap();
    assert_eq!(export.count, 2);
    assert!(export.text.contains(r#"type="rejected""#));
    assert!(export.text.contains(r#"<entry host="https://b.example x"/>"#));

    let again = TestHarness::new().unwrap();
    let report = Importer::new(&again.store, CancellationToken::new())
        .import_disabled_text(&export.text)
        .unwrap();
    assert_eq!(report.imported_count, 2);
    assert_eq!(
        again.store.disabled_hosts().unwrap(),
        harness.store.disabled_hosts().unwrap()
    );
}
