// SPDX-FileCopyrightText: 2026 Pwdex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end import and export tests.
//!
//! `TestHarness` owns a temp directory holding a migrated SQLite credential
//! store, and writes export files and foreign `Login Data` databases next
//! to it.

use std::path::{Path, PathBuf};

use pwdex_core::PwdexError;
use pwdex_foreign::ForeignRow;
use pwdex_storage::SqliteCredentialStore;
use rusqlite::{Connection, params};
use tempfile::TempDir;

const LOGIN_DATA_SCHEMA: &str = "CREATE TABLE logins (
    origin_url VARCHAR NOT NULL,
    action_url VARCHAR,
    username_element VARCHAR,
    username_value VARCHAR,
    password_element VARCHAR,
    password_value BLOB,
    submit_element VARCHAR,
    signon_realm VARCHAR NOT NULL,
    preferred INTEGER NOT NULL DEFAULT 0,
    date_created INTEGER NOT NULL,
    blacklisted_by_user INTEGER NOT NULL DEFAULT 0,
    scheme INTEGER NOT NULL,
    times_used INTEGER
);";

/// A temp directory with a fresh credential store inside it.
pub struct TestHarness {
    dir: TempDir,
    pub store: SqliteCredentialStore,
}

impl TestHarness {
    pub fn new() -> Result<Self, PwdexError> {
        let dir = TempDir::new()?;
        let store = SqliteCredentialStore::open(dir.path().join("logins.db"))?;
        Ok(Self { dir, store })
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    pub fn store_path(&self) -> PathBuf {
        self.dir.path().join("logins.db")
    }

    /// Write `contents` to `name` inside the harness directory.
    pub fn write_file(&self, name: &str, contents: &str) -> Result<PathBuf, PwdexError> {
        let path = self.dir.path().join(name);
        std::fs::write(&path, contents)?;
        Ok(path)
    }

    /// Create a Chromium-layout `Login Data` file holding `rows`, plus one
    /// never-save entry that readers must skip.
    pub fn write_login_data(&self, rows: &[ForeignRow]) -> Result<PathBuf, PwdexError> {
        let path = self.dir.path().join("Login Data");
        let conn = Connection::open(&path).map_err(PwdexError::storage)?;
        conn.execute_batch(LOGIN_DATA_SCHEMA)
            .map_err(PwdexError::storage)?;
        for row in rows {
            insert_row(&conn, row, false).map_err(PwdexError::storage)?;
        }
        let never = ForeignRow {
            origin_url: "https://never-save.example/".into(),
            signon_realm: "https://never-save.example/".into(),
            ..Default::default()
        };
        insert_row(&conn, &never, true).map_err(PwdexError::storage)?;
        tracing::debug!(path = %path.display(), rows = rows.len(), "login data fixture written");
        Ok(path)
    }
}

fn insert_row(conn: &Connection, row: &ForeignRow, blacklisted: bool) -> rusqlite::Result<usize> {
    conn.execute(
        "INSERT INTO logins (origin_url, action_url, username_element, username_value,
            password_element, password_value, submit_element, signon_realm, date_created,
            blacklisted_by_user, scheme, times_used)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, '', ?7, ?8, ?9, ?10, ?11)",
        params![
            row.origin_url,
            row.action_url,
            row.username_element,
            row.username_value,
            row.password_element,
            row.password_value,
            row.signon_realm,
            row.date_created,
            blacklisted,
            row.scheme,
            row.times_used,
        ],
    )
}
