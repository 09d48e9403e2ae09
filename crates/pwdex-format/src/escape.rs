// SPDX-FileCopyrightText: 2026 Pwdex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Percent-style field escaping shared by the XML and CSV layouts.
//!
//! Only the five characters that would break an XML attribute or a quoted CSV
//! field are escaped. Decoding is more permissive: older exports were written
//! with a general-purpose escaper, so `%XX` and `%uXXXX` sequences for any
//! code point are accepted.

/// Escape `%`, `<`, `>`, `"` and `&`.
///
/// Single pass over the input, so the `%25` produced for a literal percent is
/// never escaped again.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '%' => out.push_str("%25"),
            '<' => out.push_str("%3C"),
            '>' => out.push_str("%3E"),
            '"' => out.push_str("%22"),
            '&' => out.push_str("%26"),
            _ => out.push(c),
        }
    }
    out
}

/// Decode `%XX` and `%uXXXX` sequences.
///
/// `%XX` maps to U+00XX. `%uXXXX` is a UTF-16 code unit; surrogate pairs are
/// joined and unpaired surrogates become U+FFFD. Anything that is not a
/// well-formed sequence is kept as-is.
pub fn unescape(input: &str) -> String {
    if !input.contains('%') {
        return input.to_string();
    }

    let mut units: Vec<u16> = Vec::with_capacity(input.len());
    let mut rest = input;
    while let Some(c) = rest.chars().next() {
        if c == '%' {
            let wide = rest[1..].starts_with('u');
            if let Some(unit) = rest.get(2..6).filter(|_| wide).and_then(hex_u16) {
                units.push(unit);
                rest = &rest[6..];
                continue;
            }
            if let Some(unit) = rest.get(1..3).and_then(hex_u16) {
                units.push(unit);
                rest = &rest[3..];
                continue;
            }
        }
        let mut buf = [0u16; 2];
        units.extend_from_slice(c.encode_utf16(&mut buf));
        rest = &rest[c.len_utf8()..];
    }

    String::from_utf16_lossy(&units)
}

fn hex_u16(digits: &str) -> Option<u16> {
    if digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        u16::from_str_radix(digits, 16).ok()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn escapes_reserved_characters() {
        assert_eq!(escape(r#"a%b<c>d"e&f"#), "a%25b%3Cc%3Ed%22e%26f");
    }

    #[test]
    fn percent_is_not_double_escaped() {
        assert_eq!(escape("<"), "%3C");
        assert_eq!(escape("%3C"), "%253C");
    }

    #[test]
    fn plain_text_is_untouched() {
        assert_eq!(escape("https://example.com/login?a=1"), "https://example.com/login?a=1");
        assert_eq!(unescape("alice"), "alice");
    }

    #[test]
    fn unescape_reverses_escape() {
        assert_eq!(unescape("a%25b%3Cc%3Ed%22e%26f"), r#"a%b<c>d"e&f"#);
    }

    #[test]
    fn unescape_accepts_legacy_sequences() {
        assert_eq!(unescape("caf%E9"), "café");
        assert_eq!(unescape("%u00e9t%u00E9"), "été");
        assert_eq!(unescape("%uD83D%uDE00"), "\u{1F600}");
        assert_eq!(unescape("a%20b"), "a b");
    }

    #[test]
    fn unescape_keeps_malformed_sequences() {
        assert_eq!(unescape("100%"), "100%");
        assert_eq!(unescape("%zz"), "%zz");
        assert_eq!(unescape("%u12"), "%u12");
        assert_eq!(unescape("%+1"), "%+1");
        assert_eq!(unescape("%é"), "%é");
    }

    #[test]
    fn unpaired_surrogate_is_replaced() {
        assert_eq!(unescape("x%uD800y"), "x\u{FFFD}y");
    }

    proptest! {
        #[test]
        fn escape_then_unescape_is_identity(s in "\\PC*") {
            prop_assert_eq!(unescape(&escape(&s)), s);
        }

        #[test]
        fn escaped_output_has_no_reserved_characters(s in "\\PC*") {
            let escaped = escape(&s);
            prop_assert!(!escaped.contains(['<', '>', '"', '&']));
        }

        #[test]
        fn escape_is_injective(a in "[%<>\"&a-c]{0,8}", b in "[%<>\"&a-c]{0,8}") {
            if a != b {
                prop_assert_ne!(escape(&a), escape(&b));
            }
        }
    }
}
