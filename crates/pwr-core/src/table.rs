//! Raw tabular types as read from an export file

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// A parsed export file, before normalization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTable {
    /// Column definitions, in header order
    pub columns: Vec<Column>,
    /// Row data
    pub rows: Vec<RawRow>,
    /// Source file path
    pub source_path: PathBuf,
}

impl RawTable {
    /// Create a new empty table
    pub fn new(source_path: PathBuf) -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
            source_path,
        }
    }

    /// Get the number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Get the number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Find a column by name
    pub fn find_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Check whether the header names a column
    pub fn has_column(&self, name: &str) -> bool {
        self.find_column(name).is_some()
    }
}

/// A column definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    /// Column name as written in the header (e.g., "url" or "extra")
    pub name: String,
    /// Column index (0-based)
    pub index: usize,
}

impl Column {
    /// Create a new column
    pub fn new(name: String, index: usize) -> Self {
        Self { name, index }
    }
}

/// One row of an export, addressed by column name
///
/// A field the row does not carry is absent, which is distinct from a
/// field that is present but empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRow {
    fields: BTreeMap<String, String>,
}

impl RawRow {
    /// Create a row with no fields
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a field by column name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Set a field, replacing any previous value
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Number of fields present
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the row carries no fields at all
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for RawRow
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl From<BTreeMap<String, String>> for RawRow {
    fn from(fields: BTreeMap<String, String>) -> Self {
        Self { fields }
    }
}
