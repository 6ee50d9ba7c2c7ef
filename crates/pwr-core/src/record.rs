//! Canonical credential records, normalization and join keys
//!
//! Both export shapes are mapped into [`CanonicalRecord`] here and nowhere
//! else, so everything downstream works on fixed fields.

use crate::table::{Column, RawRow, RawTable};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Column names of the canonical (browser) shape, in output order
pub const CANONICAL_FIELDS: [&str; 5] = ["name", "url", "username", "password", "note"];

/// Which export shape a table was read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Legacy vault export; free-text lives in `extra`
    Legacy,
    /// Browser password store; free-text lives in `note`
    Reference,
}

impl SourceKind {
    /// Column holding the free-text note for this shape
    pub fn note_column(self) -> &'static str {
        match self {
            SourceKind::Legacy => "extra",
            SourceKind::Reference => "note",
        }
    }

    /// Columns the normalizer reads for this shape
    pub fn expected_columns(self) -> [&'static str; 5] {
        ["name", "url", "username", "password", self.note_column()]
    }

    /// Classify a header as one of the two known shapes
    ///
    /// `url`, `username` and `password` are required. An `extra` column marks
    /// a legacy export, otherwise a `note` column marks a reference export.
    pub fn detect(columns: &[Column]) -> Option<SourceKind> {
        let has = |name: &str| columns.iter().any(|c| c.name == name);

        if !(has("url") && has("username") && has("password")) {
            return None;
        }

        if has("extra") {
            Some(SourceKind::Legacy)
        } else if has("note") {
            Some(SourceKind::Reference)
        } else {
            None
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Legacy => write!(f, "legacy"),
            SourceKind::Reference => write!(f, "reference"),
        }
    }
}

/// A credential in the unified five-field shape
///
/// Every field is always present; missing source fields are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CanonicalRecord {
    pub name: String,
    pub url: String,
    pub username: String,
    pub password: String,
    pub note: String,
}

impl CanonicalRecord {
    /// Create a record from its five fields
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        note: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            username: username.into(),
            password: password.into(),
            note: note.into(),
        }
    }

    /// The join key identifying this credential
    pub fn key(&self) -> JoinKey {
        key_of(self)
    }

    /// Field values in [`CANONICAL_FIELDS`] order
    pub fn values(&self) -> [&str; 5] {
        [
            self.name.as_str(),
            self.url.as_str(),
            self.username.as_str(),
            self.password.as_str(),
            self.note.as_str(),
        ]
    }

    /// The record as a column-name mapping in the canonical shape
    pub fn to_mapping(&self) -> BTreeMap<String, String> {
        CANONICAL_FIELDS
            .iter()
            .zip(self.values())
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }
}

/// Identity of a credential across sources: `(url, username)`
///
/// Kept as a pair rather than a delimited string, so two distinct pairs can
/// never collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JoinKey {
    pub url: String,
    pub username: String,
}

impl fmt::Display for JoinKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.url, self.username)
    }
}

/// Derive the join key of a record
///
/// Values are used verbatim: no trimming and no case folding.
pub fn key_of(record: &CanonicalRecord) -> JoinKey {
    JoinKey {
        url: record.url.clone(),
        username: record.username.clone(),
    }
}

/// Map a raw row of the given shape into a canonical record
pub fn normalize(raw: &RawRow, kind: SourceKind) -> CanonicalRecord {
    let field = |name: &str| raw.get(name).unwrap_or_default().to_string();

    CanonicalRecord {
        name: field("name"),
        url: field("url"),
        username: field("username"),
        password: field("password"),
        note: field(kind.note_column()),
    }
}

/// Normalize every row of a table, preserving row order
///
/// Expected columns missing from the header are logged once each and
/// default to empty strings.
pub fn normalize_all(table: &RawTable, kind: SourceKind) -> Vec<CanonicalRecord> {
    for column in kind.expected_columns() {
        if !table.has_column(column) {
            log::warn!(
                "{} export {} has no '{}' column, defaulting to empty",
                kind,
                table.source_path.display(),
                column
            );
        }
    }

    table.rows.iter().map(|row| normalize(row, kind)).collect()
}
