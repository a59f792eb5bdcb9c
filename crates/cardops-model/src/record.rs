use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Field-keyed cells of one data row, before any business rule ran.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    /// 1-based line of the source file the row came from.
    pub source_row: usize,
    pub values: BTreeMap<String, String>,
}

impl RawRecord {
    pub fn new(source_row: usize) -> Self {
        Self {
            source_row,
            values: BTreeMap::new(),
        }
    }

    pub fn with_value(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(field.into(), value.into());
        self
    }

    /// Value for `field`, or the empty string when the column was absent.
    pub fn get(&self, field: &str) -> &str {
        self.values.get(field).map_or("", String::as_str)
    }
}

/// Normalized field values of a record that passed its schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidatedRecord {
    values: BTreeMap<String, String>,
}

impl ValidatedRecord {
    pub fn new(values: BTreeMap<String, String>) -> Self {
        Self { values }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }

    pub fn values(&self) -> &BTreeMap<String, String> {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
