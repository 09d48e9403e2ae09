// SPDX-FileCopyrightText: 2026 Pwdex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for pwdex integration tests.
//!
//! Provides collaborator doubles and on-disk fixtures for fast,
//! deterministic tests without a real browser profile.
//!
//! # Components
//!
//! - [`MemoryStore`] - In-memory credential store with failure injection
//! - [`FlakyRowSource`] - Foreign row source that fails a set number of times
//! - [`TestHarness`] - Temp directory with a SQLite store and helpers for
//!   writing export files and `Login Data` databases
//! - [`fixtures`] - Sample records and export documents

pub mod fixtures;
pub mod flaky_source;
pub mod harness;
pub mod memory_store;

pub use flaky_source::FlakyRowSource;
pub use harness::TestHarness;
pub use memory_store::MemoryStore;
