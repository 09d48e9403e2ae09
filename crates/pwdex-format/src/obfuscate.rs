// SPDX-FileCopyrightText: 2026 Pwdex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base64 obfuscation of usernames and passwords.
//!
//! This is NOT encryption. Anyone holding an export file can reverse it; it
//! only keeps credentials from being readable at a glance.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Base64-encode the UTF-8 bytes of `value`.
pub fn obfuscate(value: &str) -> String {
    STANDARD.encode(value.as_bytes())
}

/// Reverse [`obfuscate`].
///
/// Bytes that are not valid UTF-8 are read as Latin-1, which is how exports
/// from the original browser extension encoded non-ASCII characters.
pub fn deobfuscate(value: &str) -> Result<String, base64::DecodeError> {
    let bytes = STANDARD.decode(value.trim())?;
    Ok(String::from_utf8(bytes)
        .unwrap_or_else(|err| err.into_bytes().into_iter().map(char::from).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn known_vectors() {
        assert_eq!(obfuscate("secret"), "c2VjcmV0");
        assert_eq!(deobfuscate("c2VjcmV0").unwrap(), "secret");
        assert_eq!(obfuscate(""), "");
        assert_eq!(deobfuscate("").unwrap(), "");
    }

    #[test]
    fn latin1_fallback() {
        // "café" as Latin-1 bytes, base64-encoded.
        assert_eq!(deobfuscate("Y2Fm6Q==").unwrap(), "café");
    }

    #[test]
    fn invalid_base64_is_an_error() {
        assert!(deobfuscate("not base64!").is_err());
    }

    proptest! {
        #[test]
        fn round_trip(s in "\\PC*") {
            prop_assert_eq!(deobfuscate(&obfuscate(&s)).unwrap(), s);
        }
    }
}
