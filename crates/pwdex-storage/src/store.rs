// SPDX-FileCopyrightText: 2026 Pwdex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the [`CredentialStore`] trait.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use pwdex_config::model::StoreConfig;
use pwdex_core::{CredentialStore, DisabledHost, PwdexError, Record};
use rusqlite::{Connection, OptionalExtension, params};
use tracing::debug;

use crate::database;

const DUPLICATE_LOGIN: &str = "This login already exists.";

/// Credential store persisted in a local SQLite file.
///
/// Calls are serialized through a single connection.
pub struct SqliteCredentialStore {
    conn: Mutex<Connection>,
}

impl SqliteCredentialStore {
    /// Open the store at `path`, creating and migrating it as needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PwdexError> {
        let conn = database::open_connection(path.as_ref())?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn from_config(config: &StoreConfig) -> Result<Self, PwdexError> {
        Self::open(&config.database_path)
    }

    pub fn open_in_memory() -> Result<Self, PwdexError> {
        Ok(Self {
            conn: Mutex::new(database::open_in_memory()?),
        })
    }

    /// Checkpoint the WAL and close the connection.
    pub fn close(self) -> Result<(), PwdexError> {
        let conn = self
            .conn
            .into_inner()
            .map_err(|_| poisoned())?;
        database::checkpoint(&conn)?;
        conn.close().map_err(|(_, e)| PwdexError::storage(e))
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, PwdexError> {
        self.conn.lock().map_err(|_| poisoned())
    }
}

fn poisoned() -> PwdexError {
    PwdexError::Storage {
        source: "credential store connection lock poisoned".into(),
    }
}

fn is_duplicate(conn: &Connection, record: &Record) -> Result<bool, rusqlite::Error> {
    conn.query_row(
        "SELECT 1 FROM logins
         WHERE hostname = ?1 AND form_submit_url IS ?2 AND http_realm IS ?3 AND username = ?4",
        params![
            record.hostname,
            record.form_submit_url,
            record.http_realm,
            record.username,
        ],
        |_| Ok(()),
    )
    .optional()
    .map(|found| found.is_some())
}

fn check_host(host: &str) -> Result<(), PwdexError> {
    if host.is_empty() {
        return Err(PwdexError::InvalidRecord("empty hostname".to_string()));
    }
    if host.contains(['\r', '\n', '\0']) {
        return Err(PwdexError::InvalidRecord(
            "hostname contains a line break or NUL character".to_string(),
        ));
    }
    // A host with ` (` would read back as a host/realm pair.
    if host.contains(" (") || host == "." {
        return Err(PwdexError::InvalidRecord(format!(
            "invalid hostname `{host}`"
        )));
    }
    Ok(())
}

impl CredentialStore for SqliteCredentialStore {
    fn is_unlocked(&self) -> bool {
        let Ok(conn) = self.conn() else {
            return false;
        };
        conn.query_row("SELECT COUNT(*) FROM logins", [], |row| row.get::<_, i64>(0))
            .is_ok()
    }

    fn list_all(&self) -> Result<Vec<Record>, PwdexError> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT hostname, form_submit_url, http_realm, username, password,
                        username_field, password_field
                 FROM logins ORDER BY id",
            )
            .map_err(PwdexError::storage)?;
        let records = stmt
            .query_map([], |row| {
                Ok(Record {
                    hostname: row.get(0)?,
                    form_submit_url: row.get(1)?,
                    http_realm: row.get(2)?,
                    username: row.get(3)?,
                    password: row.get(4)?,
                    username_field: row.get(5)?,
                    password_field: row.get(6)?,
                })
            })
            .map_err(PwdexError::storage)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(PwdexError::storage)?;
        Ok(records)
    }

    fn insert(&self, record: &Record) -> Result<(), PwdexError> {
        let insert_error = |reason: String| PwdexError::Insert {
            hostname: record.hostname.clone(),
            reason,
        };
        record
            .check_storable()
            .map_err(|e| insert_error(e.to_string()))?;

        let conn = self.conn()?;
        if is_duplicate(&conn, record).map_err(PwdexError::storage)? {
            return Err(insert_error(DUPLICATE_LOGIN.to_string()));
        }
        conn.execute(
            "INSERT INTO logins (hostname, form_submit_url, http_realm, username, password,
                                 username_field, password_field)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                record.hostname,
                record.form_submit_url,
                record.http_realm,
                record.username,
                record.password,
                record.username_field,
                record.password_field,
            ],
        )
        .map_err(|e| insert_error(e.to_string()))?;

        debug!(
            hostname = %record.hostname,
            form_submit_url = ?record.form_submit_url,
            http_realm = ?record.http_realm,
            "login stored"
        );
        Ok(())
    }

    fn disabled_hosts(&self) -> Result<Vec<DisabledHost>, PwdexError> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare("SELECT hostname FROM disabled_hosts ORDER BY rowid")
            .map_err(PwdexError::storage)?;
        let hosts = stmt
            .query_map([], |row| row.get::<_, String>(0).map(DisabledHost::new))
            .map_err(PwdexError::storage)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(PwdexError::storage)?;
        Ok(hosts)
    }

    fn set_saving_enabled(&self, host: &str, enabled: bool) -> Result<(), PwdexError> {
        check_host(host)?;
        let conn = self.conn()?;
        let sql = if enabled {
            "DELETE FROM disabled_hosts WHERE hostname = ?1"
        } else {
            "INSERT OR IGNORE INTO disabled_hosts (hostname) VALUES (?1)"
        };
        conn.execute(sql, params![host])
            .map_err(PwdexError::storage)?;
        debug!(host, enabled, "login saving updated");
        Ok(())
    }
}
