// SPDX-FileCopyrightText: 2026 Pwdex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sample records and export documents shared by integration tests.

use pwdex_core::Record;
use pwdex_foreign::ForeignRow;

/// Five storable records covering form and HTTP-auth logins.
pub fn sample_records() -> Vec<Record> {
    let mut login = Record::form(
        "https://accounts.example.com",
        "https://accounts.example.com/login",
        "alice",
        "s3cret",
    );
    login.username_field = "email".into();
    login.password_field = "pass".into();

    vec![
        login,
        Record::form("https://shop.example", "https://shop.example", "bob", "p,w\"1"),
        Record::auth("https://intranet.example", "Staff Only", "carol", "hunter2"),
        Record::form("http://legacy.example:8080", "http://legacy.example:8080", "dave", "pw%20"),
        Record::auth("https://mail.example", "Mail <Server>", "", "only-password"),
    ]
}

/// A 1.1 CSV export with the given data lines.
pub fn csv_export(encrypted: bool, lines: &[&str]) -> String {
    let mut text = format!(
        "# Generated by Password Exporter; Export format 1.1; Encrypted: {encrypted}\n\
         \"hostname\",\"username\",\"password\",\"formSubmitURL\",\"httpRealm\",\"usernameField\",\"passwordField\"\n"
    );
    for line in lines {
        text.push_str(line);
        text.push('\n');
    }
    text
}

/// An XML export document with an arbitrary header.
pub fn xml_export(version: &str, kind: &str, entries: &[&str]) -> String {
    let mut text = format!(
        "<xml>\n<entries ext=\"Password Exporter\" extxmlversion=\"{version}\" type=\"{kind}\" encrypt=\"false\">\n"
    );
    for entry in entries {
        text.push_str(entry);
        text.push('\n');
    }
    text.push_str("</entries>\n</xml>");
    text
}

/// A disabled-hosts document listing `hosts`.
pub fn disabled_export(hosts: &[&str]) -> String {
    let entries: Vec<String> = hosts
        .iter()
        .map(|h| format!("<entry host=\"{h}\"/>"))
        .collect();
    let refs: Vec<&str> = entries.iter().map(String::as_str).collect();
    xml_export("1.0.2", "rejected", &refs)
}

/// A form-scheme foreign row with a plaintext password.
pub fn foreign_form_row(origin: &str, action: &str, username: &str, password: &str) -> ForeignRow {
    ForeignRow {
        origin_url: origin.into(),
        action_url: action.into(),
        username_element: "username".into(),
        username_value: username.into(),
        password_element: "password".into(),
        password_value: password.as_bytes().to_vec(),
        signon_realm: origin.into(),
        scheme: 0,
        date_created: 13_300_000_000_000_000,
        times_used: 1,
    }
}

/// A basic-auth foreign row for `origin` in `realm`.
pub fn foreign_auth_row(origin: &str, realm: &str, username: &str, password: &str) -> ForeignRow {
    ForeignRow {
        origin_url: origin.into(),
        username_value: username.into(),
        password_value: password.as_bytes().to_vec(),
        signon_realm: format!("{origin}/{realm}"),
        scheme: 1,
        ..Default::default()
    }
}
