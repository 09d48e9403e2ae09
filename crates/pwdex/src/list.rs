// SPDX-FileCopyrightText: 2026 Pwdex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `pwdex list` command implementation.

use pwdex_config::PwdexConfig;
use pwdex_core::{CredentialStore, PwdexError, Record};
use pwdex_storage::SqliteCredentialStore;

pub fn run_list(config: &PwdexConfig) -> Result<(), PwdexError> {
    let store = SqliteCredentialStore::from_config(&config.store)?;
    if !store.is_unlocked() {
        return Err(PwdexError::StoreLocked);
    }
    let records = store.list_all()?;
    let disabled = store.disabled_hosts()?;
    store.close()?;

    for record in &records {
        println!("{}", describe(record));
    }
    for host in &disabled {
        println!("{}\t(saving disabled)", host.hostname);
    }
    eprintln!("{} logins, {} disabled hosts", records.len(), disabled.len());
    Ok(())
}

/// One tab-separated line per login: host, username, then the realm or the
/// submit URL. Passwords are never printed.
fn describe(record: &Record) -> String {
    let target = match (&record.http_realm, &record.form_submit_url) {
        (Some(realm), _) => format!("realm: {realm}"),
        (None, Some(action)) => format!("form: {action}"),
        (None, None) => String::new(),
    };
    format!("{}\t{}\t{target}", record.hostname, record.username)
}
