// SPDX-FileCopyrightText: 2026 Pwdex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Import source for a foreign browser's credential database.
//!
//! Reads Chromium's `Login Data` SQLite file without waiting on its locks,
//! retrying a bounded number of times, then maps each row to a canonical
//! record according to its authentication scheme.

pub mod decrypt;
pub mod reader;
pub mod retry;
pub mod scheme;

pub use decrypt::{ChromiumGcmDecryptor, FOREIGN_KEY_ENV_VAR, PlaintextDecryptor, decryptor_from_env};
pub use reader::{LOGINS_QUERY, RowSource, SqliteLoginSource};
pub use retry::{RetryPolicy, read_foreign_rows};
pub use scheme::{AuthScheme, ForeignRow, map_row, pre_path};

use pwdex_core::{FieldDecryptor, FormatFailure, PwdexError, Record};
use tracing::{info, warn};

/// Records mapped from one foreign read, plus the rows that were skipped.
#[derive(Debug, Default)]
pub struct ForeignRecords {
    pub records: Vec<Record>,
    pub failures: Vec<FormatFailure>,
}

/// Read and map every row of a foreign database.
///
/// Fails only when the database cannot be read at all. Rows with an
/// unsupported scheme, a bad URL or an undecryptable password are skipped
/// and reported.
pub fn read_foreign_records<S>(
    source: &S,
    policy: RetryPolicy,
    description: &str,
    decryptor: &dyn FieldDecryptor,
) -> Result<ForeignRecords, PwdexError>
where
    S: RowSource + ?Sized,
{
    let rows = read_foreign_rows(source, policy, description)?;

    let mut out = ForeignRecords::default();
    for (idx, row) in rows.iter().enumerate() {
        match map_row(row, decryptor) {
            Ok(record) => out.records.push(record),
            Err(err) => {
                warn!(row = idx + 1, origin = %row.origin_url, error = %err, "skipping foreign row");
                out.failures.push(FormatFailure {
                    position: idx + 1,
                    hostname: Some(row.origin_url.clone()),
                    reason: err.to_string(),
                });
            }
        }
    }

    info!(
        records = out.records.len(),
        skipped = out.failures.len(),
        description,
        "foreign rows mapped"
    );
    Ok(out)
}
