use serde::{Deserialize, Serialize};

use crate::rules::Step;

fn default_required() -> bool {
    true
}

/// One canonical field of a screen and the column that carries it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub key: String,
    pub column: String,
    #[serde(default = "default_required")]
    pub required: bool,
    /// Guidance printed under the header of the sample spreadsheet.
    #[serde(default)]
    pub hint: String,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl FieldSpec {
    pub fn new(key: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            column: column.into(),
            required: true,
            hint: String::new(),
            steps: Vec::new(),
        }
    }

    #[must_use]
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    #[must_use]
    pub fn with_step(mut self, step: impl Into<Step>) -> Self {
        self.steps.push(step.into());
        self
    }

    /// Label of the requirement row in the sample spreadsheet.
    pub fn requirement_label(&self) -> &'static str {
        if self.required {
            "OBRIGATÓRIO"
        } else {
            "OPCIONAL"
        }
    }
}

/// Static configuration of one back-office form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenSpec {
    pub id: String,
    pub name: String,
    /// Banner written to the first row of the sample spreadsheet.
    #[serde(default)]
    pub title: String,
    /// Upstream operation name, also used for generated file names.
    pub operation: String,
    /// Substrings marking a row as instructions rather than data.
    #[serde(default)]
    pub keywords: Vec<String>,
    pub fields: Vec<FieldSpec>,
}

impl ScreenSpec {
    pub fn mapping(&self) -> FieldMapping {
        FieldMapping::new(
            self.fields
                .iter()
                .map(|field| (field.key.clone(), field.column.clone())),
        )
    }

    pub fn expected_columns(&self) -> Vec<String> {
        self.fields.iter().map(|field| field.column.clone()).collect()
    }

    pub fn field(&self, key: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.key == key)
    }

    pub fn field_keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.key.as_str())
    }
}

/// Fields entered once per session and merged into every staged record.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CompanySpec {
    pub fields: Vec<FieldSpec>,
}

impl CompanySpec {
    pub fn field(&self, key: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.key == key)
    }
}

/// Ordered canonical field → column name pairs of one screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMapping {
    entries: Vec<(String, String)>,
}

impl FieldMapping {
    pub fn new(entries: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    pub fn column(&self, field: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == field)
            .map(|(_, column)| column.as_str())
    }

    /// Inverse lookup used when pairing header cells with fields.
    pub fn field_for_column(&self, column: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, name)| name == column)
            .map(|(key, _)| key.as_str())
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(_, column)| column.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
