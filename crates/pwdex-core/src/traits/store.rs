// SPDX-FileCopyrightText: 2026 Pwdex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credential store trait.

use crate::error::PwdexError;
use crate::types::{DisabledHost, Record};

/// The live credential store records are exported from and imported into.
///
/// Calls are synchronous; the insertion pipeline never issues two inserts at
/// once, so implementations need not be `Sync`.
pub trait CredentialStore: Send {
    /// Whether the store is currently readable (unlocked by its master password).
    fn is_unlocked(&self) -> bool;

    /// All saved credentials, in store order.
    fn list_all(&self) -> Result<Vec<Record>, PwdexError>;

    /// Insert one record. Duplicates and malformed records are rejected.
    fn insert(&self, record: &Record) -> Result<(), PwdexError>;

    /// Hosts for which saving credentials is disabled.
    fn disabled_hosts(&self) -> Result<Vec<DisabledHost>, PwdexError>;

    /// Enable or disable credential saving for `host`.
    fn set_saving_enabled(&self, host: &str, enabled: bool) -> Result<(), PwdexError>;
}
