use std::collections::BTreeSet;
use std::path::Path;

use regex::RegexBuilder;
use serde::Deserialize;
use tracing::debug;

use cardops_model::{CompanySpec, FieldSpec, Rule, ScreenSpec};

use crate::error::StandardsError;

const DEFAULT_CATALOGUE: &str = include_str!("../data/screens.toml");
const EMBEDDED_ORIGIN: &str = "<embedded screens.toml>";

#[derive(Debug, Deserialize)]
struct Catalogue {
    #[serde(default)]
    company: CompanySpec,
    #[serde(default, rename = "screen")]
    screens: Vec<ScreenSpec>,
}

/// Validated set of screens plus the company fields shared by all of them.
#[derive(Debug, Clone)]
pub struct ScreenRegistry {
    company: CompanySpec,
    screens: Vec<ScreenSpec>,
}

impl ScreenRegistry {
    /// Load the catalogue compiled into the binary.
    pub fn load_default() -> Result<Self, StandardsError> {
        Self::from_toml_str(DEFAULT_CATALOGUE, Path::new(EMBEDDED_ORIGIN))
    }

    pub fn load_from_path(path: &Path) -> Result<Self, StandardsError> {
        let text = std::fs::read_to_string(path).map_err(|e| StandardsError::io(path, e))?;
        Self::from_toml_str(&text, path)
    }

    /// Parse and validate a catalogue. `origin` is only used in errors.
    pub fn from_toml_str(text: &str, origin: &Path) -> Result<Self, StandardsError> {
        let catalogue: Catalogue = toml::from_str(text).map_err(|source| StandardsError::Toml {
            path: origin.to_path_buf(),
            source,
        })?;
        validate_catalogue(&catalogue)?;
        debug!(
            origin = %origin.display(),
            screens = catalogue.screens.len(),
            "loaded screen catalogue"
        );
        Ok(Self {
            company: catalogue.company,
            screens: catalogue.screens,
        })
    }

    pub fn company(&self) -> &CompanySpec {
        &self.company
    }

    pub fn screens(&self) -> &[ScreenSpec] {
        &self.screens
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.screens.iter().map(|screen| screen.id.as_str())
    }

    pub fn get(&self, id: &str) -> Option<&ScreenSpec> {
        self.screens.iter().find(|screen| screen.id == id)
    }

    pub fn screen(&self, id: &str) -> Result<&ScreenSpec, StandardsError> {
        self.get(id).ok_or_else(|| StandardsError::UnknownScreen { id: id.to_string() })
    }
}

fn validate_catalogue(catalogue: &Catalogue) -> Result<(), StandardsError> {
    if catalogue.screens.is_empty() {
        return Err(StandardsError::EmptyCatalogue);
    }
    if catalogue.company.fields.is_empty() {
        return Err(StandardsError::invalid("company", "no company fields"));
    }
    validate_fields("company", &catalogue.company.fields)?;

    let mut ids = BTreeSet::new();
    for screen in &catalogue.screens {
        if !ids.insert(screen.id.as_str()) {
            return Err(StandardsError::DuplicateScreen {
                id: screen.id.clone(),
            });
        }
        validate_screen(screen)?;
    }
    Ok(())
}

fn validate_screen(screen: &ScreenSpec) -> Result<(), StandardsError> {
    if screen.operation.trim().is_empty() {
        return Err(StandardsError::invalid(&screen.id, "missing operation"));
    }
    if screen.fields.is_empty() {
        return Err(StandardsError::invalid(&screen.id, "no fields"));
    }
    validate_fields(&screen.id, &screen.fields)?;

    // A keyword found in the header row would make the header undetectable.
    let header = screen.expected_columns().join(" ").to_lowercase();
    for keyword in &screen.keywords {
        let needle = keyword.trim().to_lowercase();
        if needle.is_empty() {
            return Err(StandardsError::invalid(&screen.id, "empty keyword"));
        }
        if header.contains(&needle) {
            return Err(StandardsError::invalid(
                &screen.id,
                format!("keyword {keyword:?} matches the header row"),
            ));
        }
    }
    Ok(())
}

fn validate_fields(screen: &str, fields: &[FieldSpec]) -> Result<(), StandardsError> {
    let mut keys = BTreeSet::new();
    let mut columns = BTreeSet::new();
    for field in fields {
        if field.key.trim().is_empty() || field.column.trim().is_empty() {
            return Err(StandardsError::invalid(screen, "field with empty key or column"));
        }
        if field.column.trim() != field.column {
            return Err(StandardsError::invalid(
                screen,
                format!("column {:?} has surrounding whitespace", field.column),
            ));
        }
        if !keys.insert(field.key.as_str()) {
            return Err(StandardsError::invalid(
                screen,
                format!("duplicate field key {}", field.key),
            ));
        }
        if !columns.insert(field.column.as_str()) {
            return Err(StandardsError::invalid(
                screen,
                format!("duplicate column {}", field.column),
            ));
        }
        for step in &field.steps {
            validate_rule(screen, &field.key, &step.rule)?;
        }
    }
    Ok(())
}

fn validate_rule(screen: &str, field: &str, rule: &Rule) -> Result<(), StandardsError> {
    match rule {
        Rule::Pattern { pattern } => {
            RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .map_err(|e| {
                    StandardsError::invalid(screen, format!("field {field}: bad pattern: {e}"))
                })?;
        }
        Rule::LengthBetween { min, max } if min > max => {
            return Err(StandardsError::invalid(
                screen,
                format!("field {field}: length_between min {min} exceeds max {max}"),
            ));
        }
        Rule::OneOf { values } if values.is_empty() => {
            return Err(StandardsError::invalid(
                screen,
                format!("field {field}: one_of without values"),
            ));
        }
        _ => {}
    }
    Ok(())
}
