// SPDX-FileCopyrightText: 2026 Pwdex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Record model and common types shared across export and import.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::PwdexError;

/// The producer tag written into every export header.
pub const PRODUCER_TAG: &str = "Password Exporter";

/// A canonical credential record.
///
/// Auth-type logins carry `http_realm`, form logins carry `form_submit_url`.
/// Both absent is valid; both present is not (see [`Record::check_storable`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub hostname: String,
    pub form_submit_url: Option<String>,
    pub http_realm: Option<String>,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub username_field: String,
    #[serde(default)]
    pub password_field: String,
}

impl Record {
    /// A form login for `hostname` submitting to `action`.
    pub fn form(
        hostname: impl Into<String>,
        action: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            hostname: hostname.into(),
            form_submit_url: Some(action.into()),
            username: username.into(),
            password: password.into(),
            ..Default::default()
        }
    }

    /// An HTTP-auth login for `hostname` in `realm`.
    pub fn auth(
        hostname: impl Into<String>,
        realm: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            hostname: hostname.into(),
            http_realm: Some(realm.into()),
            username: username.into(),
            password: password.into(),
            ..Default::default()
        }
    }

    /// Clears `form_submit_url` when a realm is set; clears an empty realm otherwise.
    pub fn enforce_realm_exclusion(&mut self) {
        if self.http_realm.as_deref().is_some_and(|r| !r.is_empty()) {
            self.form_submit_url = None;
        } else {
            self.http_realm = None;
        }
    }

    /// Validate a record for serialization into an export file.
    ///
    /// Line breaks and NUL characters would corrupt both the line-oriented
    /// CSV layout and XML attribute values.
    pub fn validate(&self) -> Result<(), PwdexError> {
        if self.hostname.is_empty() {
            return Err(PwdexError::InvalidRecord("empty hostname".to_string()));
        }
        for (name, value) in self.fields() {
            if value.contains(['\r', '\n', '\0']) {
                return Err(PwdexError::InvalidRecord(format!(
                    "{name} contains a line break or NUL character"
                )));
            }
        }
        Ok(())
    }

    /// Validate a record for insertion into a credential store.
    pub fn check_storable(&self) -> Result<(), PwdexError> {
        if self.hostname.is_empty() {
            return Err(PwdexError::InvalidRecord(
                "can't add a login with an empty hostname".to_string(),
            ));
        }
        if self.password.is_empty() {
            return Err(PwdexError::InvalidRecord(
                "can't add a login with an empty password".to_string(),
            ));
        }
        if self.http_realm.is_some() && self.form_submit_url.is_some() {
            return Err(PwdexError::InvalidRecord(
                "can't add a login with both a httpRealm and formSubmitURL".to_string(),
            ));
        }
        Ok(())
    }

    fn fields(&self) -> [(&'static str, &str); 7] {
        [
            ("hostname", &self.hostname),
            ("formSubmitURL", self.form_submit_url.as_deref().unwrap_or("")),
            ("httpRealm", self.http_realm.as_deref().unwrap_or("")),
            ("username", &self.username),
            ("password", &self.password),
            ("usernameField", &self.username_field),
            ("passwordField", &self.password_field),
        ]
    }
}

/// A record as read from an export file, before normalization.
///
/// `form_submit_url` keeps the distinction between a missing value (`None`)
/// and an empty one (`Some("")`), which older schema versions rely on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    pub hostname: Option<String>,
    pub form_submit_url: Option<String>,
    pub http_realm: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub username_field: String,
    pub password_field: String,
}

/// A site for which credential saving is disabled.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DisabledHost {
    pub hostname: String,
}

impl DisabledHost {
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
        }
    }
}

/// What an export file contains, as declared by its `type` attribute.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    /// Saved credentials.
    Saved,
    /// Disabled hosts.
    Rejected,
}

/// Export format revisions accepted on import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SchemaVersion {
    V1_0_2,
    V1_0_4,
    V1_1,
}

impl SchemaVersion {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::V1_0_2 => "1.0.2",
            Self::V1_0_4 => "1.0.4",
            Self::V1_1 => "1.1",
        }
    }

    /// Versions before 1.1 had no formSubmitURL/httpRealm columns and a
    /// single-line CSV header.
    pub fn is_legacy(self) -> bool {
        matches!(self, Self::V1_0_2 | Self::V1_0_4)
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaVersion {
    type Err = PwdexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1.0.2" => Ok(Self::V1_0_2),
            "1.0.4" => Ok(Self::V1_0_4),
            "1.1" => Ok(Self::V1_1),
            other => Err(PwdexError::UnsupportedVersion {
                version: other.to_string(),
            }),
        }
    }
}

/// Validated import-side metadata, parsed once from the leading bytes of the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub producer_tag: String,
    pub record_kind: RecordKind,
    pub schema_version: SchemaVersion,
    pub encrypted: bool,
}

impl Header {
    /// The header assumed for rows read from a foreign browser database.
    pub fn foreign() -> Self {
        Self {
            producer_tag: PRODUCER_TAG.to_string(),
            record_kind: RecordKind::Saved,
            schema_version: SchemaVersion::V1_1,
            encrypted: false,
        }
    }
}

/// Interchange format for saved credentials.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Xml,
    Csv,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Xml => "xml",
            Self::Csv => "csv",
        }
    }
}

/// Line terminator used when writing export files.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    #[default]
    Lf,
    Crlf,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::Crlf => "\r\n",
        }
    }
}

/// A record that was dropped before reaching the store.
///
/// Distinct from insertion failures: these never made it out of parsing,
/// normalization, or foreign row mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatFailure {
    /// 1-based position of the entry, line, or row in the input.
    pub position: usize,
    pub hostname: Option<String>,
    pub reason: String,
}

impl fmt::Display for FormatFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.hostname {
            Some(host) => write!(f, "#{} {host} ({})", self.position, self.reason),
            None => write!(f, "#{} ({})", self.position, self.reason),
        }
    }
}
