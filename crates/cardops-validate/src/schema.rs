//! Executable field pipelines compiled from screen configuration.

use std::collections::BTreeMap;

use regex::{Regex, RegexBuilder};

use cardops_model::{
    FailureKind, FieldIssue, FieldSpec, RawRecord, Rule, ScreenSpec, ValidatedRecord,
};

use crate::error::SchemaError;
use crate::normalize::{
    alphanumeric_only, digits_only, is_date_shape, is_email, is_full_name, is_name_shape,
    is_valid_cpf, match_one_of, parse_positive_decimal, title_case,
};

#[derive(Debug, Clone)]
enum Op {
    Trim,
    DigitsOnly,
    AlphanumericOnly,
    Uppercase,
    TitleCase { strip_diacritics: bool },
    Required,
    ExactLength(usize),
    MinLength(usize),
    LengthBetween(usize, usize),
    Pattern(Regex),
    CpfChecksum,
    NameShape,
    FullName,
    DateShape,
    Email,
    PositiveDecimal,
    OneOf(Vec<String>),
}

impl Op {
    fn compile(field: &str, rule: &Rule) -> Result<Self, SchemaError> {
        Ok(match rule {
            Rule::Trim => Self::Trim,
            Rule::DigitsOnly => Self::DigitsOnly,
            Rule::AlphanumericOnly => Self::AlphanumericOnly,
            Rule::Uppercase => Self::Uppercase,
            Rule::TitleCase { strip_diacritics } => Self::TitleCase {
                strip_diacritics: *strip_diacritics,
            },
            Rule::Required => Self::Required,
            Rule::ExactLength { len } => Self::ExactLength(*len),
            Rule::MinLength { len } => Self::MinLength(*len),
            Rule::LengthBetween { min, max } => Self::LengthBetween(*min, *max),
            Rule::Pattern { pattern } => Self::Pattern(
                RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|source| SchemaError::Pattern {
                        field: field.to_string(),
                        source,
                    })?,
            ),
            Rule::CpfChecksum => Self::CpfChecksum,
            Rule::NameShape => Self::NameShape,
            Rule::FullName => Self::FullName,
            Rule::DateShape => Self::DateShape,
            Rule::Email => Self::Email,
            Rule::PositiveDecimal => Self::PositiveDecimal,
            Rule::OneOf { values } => Self::OneOf(values.clone()),
        })
    }

    fn apply(&self, value: String) -> Result<String, FailureKind> {
        let check = |ok: bool, kind: FailureKind| if ok { Ok(()) } else { Err(kind) };
        match self {
            Self::Trim => return Ok(value.trim().to_string()),
            Self::DigitsOnly => return Ok(digits_only(&value)),
            Self::AlphanumericOnly => return Ok(alphanumeric_only(&value)),
            Self::Uppercase => return Ok(value.to_uppercase()),
            Self::TitleCase { strip_diacritics } => {
                return Ok(title_case(&value, *strip_diacritics));
            }
            Self::PositiveDecimal => {
                return parse_positive_decimal(&value).ok_or(FailureKind::NotPositive);
            }
            Self::OneOf(allowed) => {
                return match_one_of(&value, allowed)
                    .map(str::to_string)
                    .ok_or_else(|| FailureKind::NotAllowed {
                        allowed: allowed.clone(),
                    });
            }
            Self::Required => check(!value.trim().is_empty(), FailureKind::Required)?,
            Self::ExactLength(len) => {
                let actual = value.chars().count();
                check(
                    actual == *len,
                    FailureKind::Length {
                        expected: *len,
                        actual,
                    },
                )?;
            }
            Self::MinLength(min) => {
                let actual = value.chars().count();
                check(actual >= *min, FailureKind::TooShort { min: *min, actual })?;
            }
            Self::LengthBetween(min, max) => {
                let actual = value.chars().count();
                check(
                    (*min..=*max).contains(&actual),
                    FailureKind::LengthOutOfRange {
                        min: *min,
                        max: *max,
                        actual,
                    },
                )?;
            }
            Self::Pattern(regex) => check(regex.is_match(&value), FailureKind::Pattern)?,
            Self::CpfChecksum => check(is_valid_cpf(&value), FailureKind::CpfChecksum)?,
            Self::NameShape => check(is_name_shape(&value), FailureKind::NameShape)?,
            Self::FullName => check(is_full_name(&value), FailureKind::FullName)?,
            Self::DateShape => check(is_date_shape(&value), FailureKind::DateShape)?,
            Self::Email => check(is_email(&value), FailureKind::Email)?,
        }
        Ok(value)
    }
}

#[derive(Debug, Clone)]
struct CompiledStep {
    op: Op,
    message: Option<String>,
}

/// Ordered steps of one field. Evaluation stops at the first failure.
#[derive(Debug, Clone)]
pub struct FieldPipeline {
    key: String,
    column: String,
    required: bool,
    steps: Vec<CompiledStep>,
}

impl FieldPipeline {
    pub fn compile(spec: &FieldSpec) -> Result<Self, SchemaError> {
        let steps = spec
            .steps
            .iter()
            .map(|step| {
                Ok(CompiledStep {
                    op: Op::compile(&spec.key, &step.rule)?,
                    message: step.message.clone(),
                })
            })
            .collect::<Result<Vec<_>, SchemaError>>()?;
        Ok(Self {
            key: spec.key.clone(),
            column: spec.column.clone(),
            required: spec.required,
            steps,
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Run the pipeline on a raw cell. Empty optional fields skip the
    /// pipeline and normalize to the empty string.
    pub fn run(&self, raw: &str) -> Result<String, FieldIssue> {
        if !self.required && raw.trim().is_empty() {
            return Ok(String::new());
        }
        let mut value = raw.to_string();
        for step in &self.steps {
            value = step
                .op
                .apply(value)
                .map_err(|kind| self.issue(kind, step.message.as_deref()))?;
        }
        if self.required && value.trim().is_empty() {
            return Err(self.issue(FailureKind::Required, None));
        }
        Ok(value)
    }

    fn issue(&self, kind: FailureKind, message: Option<&str>) -> FieldIssue {
        let message = message.map_or_else(|| kind.default_message(&self.column), str::to_string);
        FieldIssue {
            field: self.key.clone(),
            column: self.column.clone(),
            kind,
            message,
        }
    }
}

/// Named set of field pipelines for one screen.
#[derive(Debug, Clone)]
pub struct RecordSchema {
    name: String,
    fields: Vec<FieldPipeline>,
}

impl RecordSchema {
    pub fn compile(screen: &ScreenSpec) -> Result<Self, SchemaError> {
        Self::from_fields(&screen.id, &screen.fields)
    }

    pub fn from_fields(name: &str, fields: &[FieldSpec]) -> Result<Self, SchemaError> {
        let fields = fields
            .iter()
            .map(FieldPipeline::compile)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            name: name.to_string(),
            fields,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[FieldPipeline] {
        &self.fields
    }

    pub fn field_keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(FieldPipeline::key)
    }

    pub fn validate(&self, raw: &RawRecord) -> Result<ValidatedRecord, Vec<FieldIssue>> {
        self.validate_with(|key| raw.get(key))
    }

    /// Validate form input keyed by field name; missing keys read as empty.
    pub fn validate_values(
        &self,
        values: &BTreeMap<String, String>,
    ) -> Result<ValidatedRecord, Vec<FieldIssue>> {
        self.validate_with(|key| values.get(key).map_or("", String::as_str))
    }

    /// Every field runs; issues from all failing fields are collected.
    fn validate_with<'a>(
        &self,
        lookup: impl Fn(&str) -> &'a str,
    ) -> Result<ValidatedRecord, Vec<FieldIssue>> {
        let mut values = BTreeMap::new();
        let mut issues = Vec::new();
        for field in &self.fields {
            match field.run(lookup(field.key())) {
                Ok(value) => {
                    values.insert(field.key().to_string(), value);
                }
                Err(issue) => issues.push(issue),
            }
        }
        if issues.is_empty() {
            Ok(ValidatedRecord::new(values))
        } else {
            Err(issues)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardops_model::Step;

    fn name_field() -> FieldSpec {
        FieldSpec::new("nome", "Nome Completo")
            .with_step(Rule::Trim)
            .with_step(Step::new(Rule::Required).with_message("Nome Completo é obrigatório."))
            .with_step(Rule::NameShape)
            .with_step(Rule::FullName)
            .with_step(Rule::TitleCase {
                strip_diacritics: false,
            })
    }

    #[test]
    fn stops_at_first_failing_step() {
        let pipeline = FieldPipeline::compile(&name_field()).expect("compile");
        let issue = pipeline.run("   ").expect_err("blank name");
        assert_eq!(issue.kind, FailureKind::Required);
        assert_eq!(issue.message, "Nome Completo é obrigatório.");

        let issue = pipeline.run("Maria").expect_err("single word");
        assert_eq!(issue.kind, FailureKind::FullName);
        assert_eq!(issue.message, "É necessário inserir o nome e sobrenome.");

        assert_eq!(pipeline.run("MARIA   silva").expect("valid"), "Maria Silva");
    }

    #[test]
    fn optional_empty_field_skips_pipeline() {
        let spec = FieldSpec::new("departamento", "Departamento")
            .optional()
            .with_step(Rule::NameShape);
        let pipeline = FieldPipeline::compile(&spec).expect("compile");
        assert_eq!(pipeline.run("  ").expect("empty optional"), "");
        assert!(pipeline.run("Vendas 2").is_err());
    }

    #[test]
    fn required_field_without_checks_still_rejects_empty() {
        let spec = FieldSpec::new("departamento", "Nome do Departamento").with_step(Rule::Trim);
        let pipeline = FieldPipeline::compile(&spec).expect("compile");
        let issue = pipeline.run(" ").expect_err("empty");
        assert_eq!(issue.message, "Nome do Departamento é obrigatório.");
    }

    #[test]
    fn bad_pattern_fails_compilation() {
        let spec = FieldSpec::new("placa", "Placa").with_step(Rule::Pattern {
            pattern: "([A-Z".to_string(),
        });
        let err = FieldPipeline::compile(&spec).expect_err("bad pattern");
        assert!(matches!(err, SchemaError::Pattern { ref field, .. } if field == "placa"));
    }
}
