// SPDX-FileCopyrightText: 2026 Pwdex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mapping of foreign `logins` rows to canonical records.

use pwdex_core::{FieldDecryptor, PwdexError, Record};
use url::Url;

/// One row of the fixed `logins` query, in column order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForeignRow {
    pub origin_url: String,
    pub action_url: String,
    pub username_element: String,
    pub username_value: String,
    pub password_element: String,
    pub password_value: Vec<u8>,
    pub signon_realm: String,
    pub scheme: i64,
    pub date_created: i64,
    pub times_used: i64,
}

/// How the foreign browser authenticated to the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    HtmlForm,
    HttpBasic,
    HttpDigest,
}

impl TryFrom<i64> for AuthScheme {
    type Error = PwdexError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::HtmlForm),
            1 => Ok(Self::HttpBasic),
            2 => Ok(Self::HttpDigest),
            other => Err(PwdexError::UnsupportedScheme(other)),
        }
    }
}

/// Build a canonical record from a foreign row, decrypting the password.
pub fn map_row(row: &ForeignRow, decryptor: &dyn FieldDecryptor) -> Result<Record, PwdexError> {
    let scheme = AuthScheme::try_from(row.scheme)?;
    let hostname = pre_path(&row.origin_url)?;

    let mut record = Record {
        password: decryptor.decrypt(&row.password_value)?,
        username: row.username_value.clone(),
        username_field: row.username_element.clone(),
        password_field: row.password_element.clone(),
        ..Default::default()
    };

    match scheme {
        AuthScheme::HtmlForm => record.form_submit_url = Some(pre_path(&row.action_url)?),
        AuthScheme::HttpBasic | AuthScheme::HttpDigest => {
            // signon_realm is "<hostname>/<realm>".
            let skip = hostname.chars().count() + 1;
            record.http_realm = Some(row.signon_realm.chars().skip(skip).collect());
        }
    }
    record.hostname = hostname;

    Ok(record)
}

/// `scheme://[userinfo@]host[:port]` of a URL.
///
/// URLs without an authority (`javascript:`, `data:`) reduce to `scheme:`.
pub fn pre_path(raw: &str) -> Result<String, PwdexError> {
    let url = Url::parse(raw)
        .map_err(|e| PwdexError::InvalidRecord(format!("invalid URL `{raw}`: {e}")))?;

    if url.cannot_be_a_base() {
        return Ok(format!("{}:", url.scheme()));
    }

    let mut out = format!("{}://", url.scheme());
    if !url.username().is_empty() {
        out.push_str(url.username());
        if let Some(password) = url.password() {
            out.push(':');
            out.push_str(password);
        }
        out.push('@');
    }
    out.push_str(url.host_str().unwrap_or_default());
    if let Some(port) = url.port() {
        out.push(':');
        out.push_str(&port.to_string());
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decrypt::PlaintextDecryptor;

    fn row(scheme: i64) -> ForeignRow {
        ForeignRow {
            origin_url: "https://accounts.example.com/signin?next=/".into(),
            action_url: "https://accounts.example.com:8443/session".into(),
            username_element: "email".into(),
            username_value: "alice@example.com".into(),
            password_element: "passwd".into(),
            password_value: b"hunter2".to_vec(),
            signon_realm: "https://accounts.example.com/Secure Area".into(),
            scheme,
            ..Default::default()
        }
    }

    #[test]
    fn html_form_row() {
        let record = map_row(&row(0), &PlaintextDecryptor).unwrap();
        assert_eq!(record.hostname, "https://accounts.example.com");
        assert_eq!(
            record.form_submit_url.as_deref(),
            Some("https://accounts.example.com:8443")
        );
        assert_eq!(record.http_realm, None);
        assert_eq!(record.username, "alice@example.com");
        assert_eq!(record.password, "hunter2");
        assert_eq!(record.username_field, "email");
        assert_eq!(record.password_field, "passwd");
    }

    #[test]
    fn basic_and_digest_rows_get_realm() {
        for scheme in [1, 2] {
            let record = map_row(&row(scheme), &PlaintextDecryptor).unwrap();
            assert_eq!(record.http_realm.as_deref(), Some("Secure Area"));
            assert_eq!(record.form_submit_url, None);
        }
    }

    #[test]
    fn unknown_scheme_is_rejected() {
        let err = map_row(&row(3), &PlaintextDecryptor).unwrap_err();
        assert!(matches!(err, PwdexError::UnsupportedScheme(3)));
    }

    #[test]
    fn invalid_action_url_fails_the_row() {
        let mut r = row(0);
        r.action_url = String::new();
        assert!(map_row(&r, &PlaintextDecryptor).is_err());
    }

    #[test]
    fn pre_path_variants() {
        assert_eq!(pre_path("https://example.com/a/b?c").unwrap(), "https://example.com");
        assert_eq!(pre_path("http://example.com:80/").unwrap(), "http://example.com");
        assert_eq!(pre_path("http://example.com:8080/").unwrap(), "http://example.com:8080");
        assert_eq!(pre_path("ftp://user:pw@files.example/").unwrap(), "ftp://user:pw@files.example");
        assert_eq!(pre_path("android://abc@com.example.app/").unwrap(), "android://abc@com.example.app");
        assert_eq!(pre_path("javascript:void(0)").unwrap(), "javascript:");
    }
}
