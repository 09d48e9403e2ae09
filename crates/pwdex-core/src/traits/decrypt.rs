// SPDX-FileCopyrightText: 2026 Pwdex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Decryption service for natively encrypted foreign database fields.

use crate::error::PwdexError;

/// Decrypts a field encrypted by a foreign browser's own key management.
pub trait FieldDecryptor: Send {
    /// Decrypt `ciphertext` into its UTF-8 plaintext.
    fn decrypt(&self, ciphertext: &[u8]) -> Result<String, PwdexError>;
}
