// SPDX-FileCopyrightText: 2026 Pwdex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Interfaces of the external collaborators pwdex talks to.
//!
//! The credential store and the foreign-field decryption service live
//! outside the format and import logic; they are reached only through these
//! traits so tests can substitute in-memory doubles.

pub mod decrypt;
pub mod store;

pub use decrypt::FieldDecryptor;
pub use store::CredentialStore;
