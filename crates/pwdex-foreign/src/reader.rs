// SPDX-FileCopyrightText: 2026 Pwdex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Single-attempt access to a foreign credential database.

use std::path::{Path, PathBuf};

use pwdex_core::PwdexError;
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags, Row};
use tracing::debug;
use url::Url;

use crate::scheme::ForeignRow;

/// The fixed selection run against the foreign `logins` table.
pub const LOGINS_QUERY: &str = "SELECT origin_url, action_url, username_element, username_value, \
     password_element, password_value, signon_realm, scheme, date_created, times_used \
     FROM logins WHERE blacklisted_by_user = 0";

/// Something that can produce the foreign rows in one attempt.
///
/// Implementations open, query and close on every call; retrying is the
/// caller's job.
pub trait RowSource {
    fn fetch_rows(&self) -> Result<Vec<ForeignRow>, PwdexError>;
}

/// A Chromium `Login Data` SQLite file.
#[derive(Debug, Clone)]
pub struct SqliteLoginSource {
    path: PathBuf,
    ignore_locks: bool,
}

impl SqliteLoginSource {
    pub fn new(path: impl Into<PathBuf>, ignore_locks: bool) -> Self {
        Self {
            path: path.into(),
            ignore_locks,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open read-only. With `ignore_locks`, SQLite is told not to take file
    /// locks at all so a browser holding the database does not block us.
    fn open(&self) -> Result<Connection, PwdexError> {
        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;

        let target = if self.ignore_locks {
            let absolute = std::path::absolute(&self.path)?;
            let mut uri = Url::from_file_path(&absolute).map_err(|()| {
                PwdexError::Config(format!(
                    "cannot build a database URI for {}",
                    absolute.display()
                ))
            })?;
            uri.set_query(Some("nolock=1"));
            uri.to_string()
        } else {
            self.path.display().to_string()
        };

        Connection::open_with_flags(&target, flags).map_err(foreign_read)
    }
}

impl RowSource for SqliteLoginSource {
    fn fetch_rows(&self) -> Result<Vec<ForeignRow>, PwdexError> {
        let conn = self.open()?;
        let rows = query_logins(&conn).map_err(foreign_read);

        // A failed close must not mask the query result.
        if let Err((_, err)) = conn.close() {
            debug!(error = %err, "ignoring error while closing foreign database");
        }
        rows
    }
}

fn query_logins(conn: &Connection) -> Result<Vec<ForeignRow>, rusqlite::Error> {
    let mut stmt = conn.prepare(LOGINS_QUERY)?;
    let rows = stmt
        .query_map([], map_foreign_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

fn map_foreign_row(row: &Row<'_>) -> Result<ForeignRow, rusqlite::Error> {
    let text = |idx: usize| -> Result<String, rusqlite::Error> {
        Ok(row.get::<_, Option<String>>(idx)?.unwrap_or_default())
    };
    let int = |idx: usize| -> Result<i64, rusqlite::Error> {
        Ok(row.get::<_, Option<i64>>(idx)?.unwrap_or_default())
    };

    // Some profiles store password_value as TEXT rather than BLOB.
    let password_value = match row.get_ref(5)? {
        ValueRef::Blob(bytes) | ValueRef::Text(bytes) => bytes.to_vec(),
        _ => Vec::new(),
    };

    Ok(ForeignRow {
        origin_url: text(0)?,
        action_url: text(1)?,
        username_element: text(2)?,
        username_value: text(3)?,
        password_element: text(4)?,
        password_value,
        signon_realm: text(6)?,
        scheme: row.get(7)?,
        date_created: int(8)?,
        times_used: int(9)?,
    })
}

fn foreign_read(err: rusqlite::Error) -> PwdexError {
    PwdexError::ForeignRead {
        source: Box::new(err),
    }
}
