// SPDX-FileCopyrightText: 2026 Pwdex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Upgrade of logins written in the pre-2.0 login manager conventions.
//!
//! Old stores kept HTTP-auth logins as bare `host:port` strings and put
//! channel logins (ftp, mail, news) in the same shape as form logins. A
//! single old login can become two current ones when the scheme cannot be
//! derived from the port.

use std::sync::LazyLock;

use pwdex_core::Record;
use regex::Regex;
use tracing::debug;
use url::Url;

static TRAILING_PORT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":\d+$").expect("valid regex"));

static MAIL_NEWS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(ldaps?|smtp|imap|news|mailbox)://").expect("valid regex")
});

static HTTP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^https?://").expect("valid regex"));

/// Directory and news logins keep their path in the realm.
static PATH_IN_REALM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(ldaps?|news?)://").expect("valid regex"));

/// Default ports for schemes the `url` crate does not know about.
fn default_port(scheme: &str) -> Option<u16> {
    match scheme {
        "ldap" => Some(389),
        "ldaps" => Some(636),
        "imap" => Some(143),
        "pop3" => Some(110),
        "smtp" => Some(25),
        "news" | "nntp" => Some(119),
        _ => None,
    }
}

/// Convert one record to current conventions. Always returns at least one record.
pub fn upgrade_legacy(record: Record) -> Vec<Record> {
    if record.hostname.contains("://") {
        vec![upgrade_url_login(record)]
    } else {
        upgrade_host_port_login(record)
    }
}

/// `site.com:80` -> `http://site.com`, `site.com:443` -> `https://site.com`,
/// any other port yields both schemes.
fn upgrade_host_port_login(mut record: Record) -> Vec<Record> {
    if !TRAILING_PORT.is_match(&record.hostname) {
        return vec![record];
    }

    let Ok(url) = Url::parse(&format!("http://{}", record.hostname)) else {
        debug!(hostname = %record.hostname, "cannot parse legacy host, leaving unchanged");
        return vec![record];
    };
    let Some(host) = url.host_str() else {
        return vec![record];
    };

    let mut upgraded = Vec::with_capacity(2);
    match url.port() {
        None => record.hostname = format!("http://{host}"),
        Some(443) => record.hostname = format!("https://{host}"),
        Some(port) => {
            debug!(hostname = %record.hostname, "cloning login for both http and https");
            record.hostname = format!("http://{host}:{port}");
            upgraded.push(Record {
                hostname: format!("https://{host}:{port}"),
                form_submit_url: None,
                http_realm: record.http_realm.clone(),
                username: record.username.clone(),
                password: record.password.clone(),
                username_field: String::new(),
                password_field: String::new(),
            });
        }
    }
    upgraded.insert(0, record);

    for login in &mut upgraded {
        if login.http_realm.as_deref().is_none_or(str::is_empty) {
            login.http_realm = Some(login.hostname.clone());
        }
    }
    upgraded
}

/// Form logins and non-HTTP channel logins.
fn upgrade_url_login(mut record: Record) -> Record {
    let is_mail_news = MAIL_NEWS.is_match(&record.hostname);
    let has_submit_url = record.form_submit_url.as_deref().is_some_and(|s| !s.is_empty());
    let is_form_login = (has_submit_url
        || !record.username_field.is_empty()
        || !record.password_field.is_empty())
        && !is_mail_news;

    let cleaned = CleanUrl::new(&record.hostname);
    record.hostname = cleaned.url;

    // Channel logins kept the username in the URL.
    if let Some(user) = cleaned.username
        && !is_form_login
    {
        record.username = if is_mail_news {
            percent_decode(&user)
        } else {
            user
        };
    }

    if has_submit_url && let Some(action) = record.form_submit_url.take() {
        record.form_submit_url = Some(CleanUrl::new(&action).url);
    }

    if !HTTP.is_match(&record.hostname) && !is_form_login {
        if record.http_realm.as_deref().is_none_or(str::is_empty) {
            let realm = if PATH_IN_REALM.is_match(&record.hostname) {
                format!("{}{}", record.hostname, cleaned.path)
            } else {
                record.hostname.clone()
            };
            debug!(hostname = %record.hostname, realm = %realm, "channel login gets realm");
            record.http_realm = Some(realm);
        }
        record.form_submit_url = None;

        if is_mail_news {
            record.username_field.clear();
            record.password_field.clear();
        }
    }

    record
}

/// A URL reduced to `scheme://host[:port]`, plus the parts that were cut off.
struct CleanUrl {
    url: String,
    username: Option<String>,
    path: String,
}

impl CleanUrl {
    fn new(raw: &str) -> Self {
        let Ok(url) = Url::parse(raw) else {
            debug!(url = raw, "cannot clean up URL, leaving unchanged");
            return Self {
                url: raw.to_string(),
                username: None,
                path: String::new(),
            };
        };

        let scheme = url.scheme();
        if scheme == "javascript" {
            return Self {
                url: "javascript:".to_string(),
                username: None,
                path: String::new(),
            };
        }

        let mut clean = format!("{scheme}://{}", url.host_str().unwrap_or_default());
        if let Some(port) = url.port()
            && Some(port) != default_port(scheme)
        {
            clean.push_str(&format!(":{port}"));
        }

        let username = (scheme != "http" && scheme != "https" && !url.username().is_empty())
            .then(|| url.username().to_string());

        let mut path = url.path().to_string();
        if let Some(query) = url.query() {
            path.push('?');
            path.push_str(query);
        }
        if path == "/" {
            path.clear();
        }

        Self {
            url: clean,
            username,
            path,
        }
    }
}

fn percent_decode(input: &str) -> String {
    let mut bytes = Vec::with_capacity(input.len());
    let mut rest = input.as_bytes();
    while let Some((&first, tail)) = rest.split_first() {
        if first == b'%'
            && let Some(hex) = tail.get(..2)
            && hex.iter().all(u8::is_ascii_hexdigit)
        {
            let digits = std::str::from_utf8(hex).unwrap_or_default();
            if let Ok(byte) = u8::from_str_radix(digits, 16) {
                bytes.push(byte);
                rest = &tail[2..];
                continue;
            }
        }
        bytes.push(first);
        rest = tail;
    }
    String::from_utf8_lossy(&bytes).into_owned()
}
