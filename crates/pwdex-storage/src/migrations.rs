// SPDX-FileCopyrightText: 2026 Pwdex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedded schema migrations for the credential store.
//!
//! The SQL files under `migrations/` are compiled into the binary and applied
//! every time a store is opened.

use pwdex_core::PwdexError;

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

/// Apply every pending migration.
///
/// Refinery records what it applied in `refinery_schema_history`.
pub fn run_migrations(conn: &mut rusqlite::Connection) -> Result<(), PwdexError> {
    let report = embedded::migrations::runner()
        .run(conn)
        .map_err(PwdexError::storage)?;
    for migration in report.applied_migrations() {
        tracing::debug!(version = migration.version(), name = migration.name(), "migration applied");
    }
    Ok(())
}
