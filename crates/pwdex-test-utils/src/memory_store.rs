// SPDX-FileCopyrightText: 2026 Pwdex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory credential store for deterministic testing.
//!
//! `MemoryStore` implements `CredentialStore` with a lock switch and
//! per-hostname insert failure injection, and captures every insert attempt
//! for assertion in tests.

use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use pwdex_core::{CredentialStore, DisabledHost, PwdexError, Record};

#[derive(Default)]
struct Inner {
    records: Vec<Record>,
    disabled: Vec<DisabledHost>,
    fail_hosts: HashSet<String>,
    insert_attempts: usize,
}

/// A credential store kept entirely in memory.
///
/// Duplicate detection and storability checks match the SQLite store.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
    locked: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-filled with `records`.
    pub fn with_records(records: impl IntoIterator<Item = Record>) -> Self {
        let store = Self::new();
        store.lock_inner().records.extend(records);
        store
    }

    /// Make every later insert for `hostname` fail.
    pub fn fail_inserts_for(&self, hostname: impl Into<String>) {
        self.lock_inner().fail_hosts.insert(hostname.into());
    }

    /// Simulate the master password being required (or entered).
    pub fn set_locked(&self, locked: bool) {
        self.locked.store(locked, Ordering::SeqCst);
    }

    /// Snapshot of the stored records.
    pub fn records(&self) -> Vec<Record> {
        self.lock_inner().records.clone()
    }

    pub fn disabled(&self) -> Vec<DisabledHost> {
        self.lock_inner().disabled.clone()
    }

    /// Number of `insert` calls, successful or not.
    pub fn insert_attempts(&self) -> usize {
        self.lock_inner().insert_attempts
    }

    fn lock_inner(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn ensure_unlocked(&self) -> Result<(), PwdexError> {
        if self.locked.load(Ordering::SeqCst) {
            return Err(PwdexError::StoreLocked);
        }
        Ok(())
    }
}

impl CredentialStore for MemoryStore {
    fn is_unlocked(&self) -> bool {
        !self.locked.load(Ordering::SeqCst)
    }

    fn list_all(&self) -> Result<Vec<Record>, PwdexError> {
        self.ensure_unlocked()?;
        Ok(self.records())
    }

    fn insert(&self, record: &Record) -> Result<(), PwdexError> {
        let mut inner = self.lock_inner();
        inner.insert_attempts += 1;
        let insert_error = |reason: &str| PwdexError::Insert {
            hostname: record.hostname.clone(),
            reason: reason.to_string(),
        };

        if inner.fail_hosts.contains(&record.hostname) {
            return Err(insert_error("injected failure"));
        }
        record
            .check_storable()
            .map_err(|e| insert_error(&e.to_string()))?;
        let duplicate = inner.records.iter().any(|r| {
            r.hostname == record.hostname
                && r.form_submit_url == record.form_submit_url
                && r.http_realm == record.http_realm
                && r.username == record.username
        });
        if duplicate {
            return Err(insert_error("This login already exists."));
        }
        inner.records.push(record.clone());
        Ok(())
    }

    fn disabled_hosts(&self) -> Result<Vec<DisabledHost>, PwdexError> {
        self.ensure_unlocked()?;
        Ok(self.disabled())
    }

    fn set_saving_enabled(&self, host: &str, enabled: bool) -> Result<(), PwdexError> {
        let mut inner = self.lock_inner();
        if inner.fail_hosts.contains(host) {
            return Err(PwdexError::InvalidRecord(format!("injected failure for {host}")));
        }
        let present = inner.disabled.iter().position(|d| d.hostname == host);
        match (enabled, present) {
            (true, Some(idx)) => {
                inner.disabled.remove(idx);
            }
            (false, None) => inner.disabled.push(DisabledHost::new(host)),
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn injected_failure_only_hits_named_host() {
        let store = MemoryStore::new();
        store.fail_inserts_for("https://bad.example");

        store
            .insert(&Record::form("https://ok.example", "", "u", "p"))
            .unwrap();
        let err = store
            .insert(&Record::form("https://bad.example", "", "u", "p"))
            .unwrap_err();

        assert!(matches!(err, PwdexError::Insert { ref hostname, .. } if hostname == "https://bad.example"));
        assert_eq!(store.records().len(), 1);
        assert_eq!(store.insert_attempts(), 2);
    }

    #[test]
    fn locked_store_refuses_reads() {
        let store = MemoryStore::with_records([Record::form("https://a.example", "", "u", "p")]);
        store.set_locked(true);
        assert!(!store.is_unlocked());
        assert!(matches!(store.list_all(), Err(PwdexError::StoreLocked)));
        store.set_locked(false);
        assert_eq!(store.list_all().unwrap().len(), 1);
    }

    #[test]
    fn duplicates_are_rejected() {
        let store = MemoryStore::new();
        let record = Record::auth("https://a.example", "r", "u", "p");
        store.insert(&record).unwrap();
        assert!(store.insert(&record).is_err());
    }

    #[test]
    fn saving_toggle() {
        let store = MemoryStore::new();
        store.set_saving_enabled("h", false).unwrap();
        store.set_saving_enabled("h", false).unwrap();
        assert_eq!(store.disabled(), vec![DisabledHost::new("h")]);
        store.set_saving_enabled("h", true).unwrap();
        assert!(store.disabled().is_empty());
    }
}
