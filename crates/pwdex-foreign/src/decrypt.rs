// SPDX-FileCopyrightText: 2026 Pwdex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Decryption of foreign `password_value` blobs.
//!
//! Chromium on Linux and Windows encrypts with AES-256-GCM and prefixes the
//! blob with `v10` or `v11`, followed by a 96-bit nonce, the ciphertext and
//! the 16-byte tag. Getting the key out of the OS keyring is left to the
//! operator; it is passed base64-encoded in `PWDEX_FOREIGN_KEY`.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use pwdex_core::{FieldDecryptor, PwdexError};
use ring::aead::{AES_256_GCM, Aad, LessSafeKey, Nonce, UnboundKey};
use secrecy::{ExposeSecret, SecretString};
use zeroize::Zeroizing;

/// Environment variable carrying the base64-encoded foreign browser key.
pub const FOREIGN_KEY_ENV_VAR: &str = "PWDEX_FOREIGN_KEY";

const VERSION_PREFIXES: [&[u8]; 2] = [b"v10", b"v11"];
const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;

fn utf8(bytes: Vec<u8>) -> Result<String, PwdexError> {
    String::from_utf8(bytes)
        .map_err(|_| PwdexError::Decrypt("decrypted value is not valid UTF-8".to_string()))
}

/// Treats every blob as UTF-8 plaintext.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaintextDecryptor;

impl FieldDecryptor for PlaintextDecryptor {
    fn decrypt(&self, ciphertext: &[u8]) -> Result<String, PwdexError> {
        utf8(ciphertext.to_vec())
    }
}

/// AES-256-GCM decryptor for `v10`/`v11` blobs. Unprefixed blobs are read as
/// plaintext.
pub struct ChromiumGcmDecryptor {
    key: Zeroizing<[u8; 32]>,
}

impl ChromiumGcmDecryptor {
    pub fn new(key: [u8; 32]) -> Self {
        Self {
            key: Zeroizing::new(key),
        }
    }

    /// Build from a base64-encoded 32-byte key.
    pub fn from_base64(encoded: &SecretString) -> Result<Self, PwdexError> {
        let bytes = Zeroizing::new(
            STANDARD
                .decode(encoded.expose_secret().trim())
                .map_err(|e| PwdexError::Decrypt(format!("foreign key is not valid base64: {e}")))?,
        );
        let key: [u8; 32] = bytes.as_slice().try_into().map_err(|_| {
            PwdexError::Decrypt(format!(
                "foreign key must be 32 bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self::new(key))
    }

    fn open(&self, sealed: &[u8]) -> Result<Vec<u8>, PwdexError> {
        if sealed.len() < NONCE_LEN + TAG_LEN {
            return Err(PwdexError::Decrypt(format!(
                "encrypted value too short ({} bytes)",
                sealed.len()
            )));
        }
        let (nonce_bytes, ciphertext) = sealed.split_at(NONCE_LEN);
        let nonce = Nonce::try_assume_unique_for_key(nonce_bytes)
            .map_err(|_| PwdexError::Decrypt("invalid nonce".to_string()))?;

        let unbound = UnboundKey::new(&AES_256_GCM, self.key.as_slice())
            .map_err(|_| PwdexError::Decrypt("failed to create AES-256-GCM key".to_string()))?;
        let key = LessSafeKey::new(unbound);

        let mut in_out = ciphertext.to_vec();
        let plaintext = key
            .open_in_place(nonce, Aad::empty(), &mut in_out)
            .map_err(|_| {
                PwdexError::Decrypt("AES-256-GCM decryption failed: wrong key or corrupted data".to_string())
            })?;
        Ok(plaintext.to_vec())
    }
}

impl FieldDecryptor for ChromiumGcmDecryptor {
    fn decrypt(&self, ciphertext: &[u8]) -> Result<String, PwdexError> {
        match VERSION_PREFIXES.iter().find(|p| ciphertext.starts_with(p)) {
            Some(prefix) => utf8(self.open(&ciphertext[prefix.len()..])?),
            None => utf8(ciphertext.to_vec()),
        }
    }
}

/// The decryptor to use for foreign imports.
///
/// `PWDEX_FOREIGN_KEY` selects AES-GCM decryption; without it blobs are read
/// as plaintext.
pub fn decryptor_from_env() -> Result<Box<dyn FieldDecryptor>, PwdexError> {
    match std::env::var(FOREIGN_KEY_ENV_VAR) {
        Ok(key) if !key.is_empty() => Ok(Box::new(ChromiumGcmDecryptor::from_base64(
            &SecretString::from(key),
        )?)),
        _ => Ok(Box::new(PlaintextDecryptor)),
    }
}
