// SPDX-FileCopyrightText: 2026 Pwdex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite-backed credential store for pwdex.
//!
//! Holds saved logins and the disabled-hosts list in one WAL-mode database
//! whose schema is managed by embedded migrations.

pub mod database;
pub mod migrations;
pub mod store;

pub use store::SqliteCredentialStore;
