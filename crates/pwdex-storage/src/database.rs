// SPDX-FileCopyrightText: 2026 Pwdex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Connection setup: PRAGMAs, WAL mode and migrations.

use std::path::Path;
use std::time::Duration;

use pwdex_core::PwdexError;
use rusqlite::Connection;
use tracing::debug;

use crate::migrations::run_migrations;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Open (creating if needed) the store database at `path` and bring its
/// schema up to date.
pub fn open_connection(path: &Path) -> Result<Connection, PwdexError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    let mut conn = Connection::open(path).map_err(PwdexError::storage)?;
    apply_pragmas(&conn)?;
    run_migrations(&mut conn)?;
    debug!(path = %path.display(), "credential store opened");
    Ok(conn)
}

/// An in-memory store database, migrated and ready to use.
pub fn open_in_memory() -> Result<Connection, PwdexError> {
    let mut conn = Connection::open_in_memory().map_err(PwdexError::storage)?;
    apply_pragmas(&conn)?;
    run_migrations(&mut conn)?;
    Ok(conn)
}

fn apply_pragmas(conn: &Connection) -> Result<(), PwdexError> {
    conn.busy_timeout(BUSY_TIMEOUT).map_err(PwdexError::storage)?;
    // In-memory databases answer "memory" here regardless.
    let mode: String = conn
        .query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))
        .map_err(PwdexError::storage)?;
    conn.pragma_update(None, "foreign_keys", "ON")
        .map_err(PwdexError::storage)?;
    conn.pragma_update(None, "synchronous", "NORMAL")
        .map_err(PwdexError::storage)?;
    debug!(journal_mode = %mode, "store pragmas applied");
    Ok(())
}

/// Fold the WAL back into the main database file.
pub fn checkpoint(conn: &Connection) -> Result<(), PwdexError> {
    conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")
        .map_err(PwdexError::storage)?;
    debug!("WAL checkpoint complete");
    Ok(())
}
