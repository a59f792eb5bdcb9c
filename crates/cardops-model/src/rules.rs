//! Declarative field rules.
//!
//! A field pipeline is an ordered list of [`Step`]s. Each step is one atomic
//! transform or check; the validation crate compiles them into executable
//! pipelines. Steps deserialize from the screen catalogue as
//! `{ op = "exact_length", len = 11, message = "..." }`.

use serde::{Deserialize, Serialize};

/// One pipeline step with an optional operator-facing message override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    #[serde(flatten)]
    pub rule: Rule,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Step {
    pub fn new(rule: Rule) -> Self {
        Self {
            rule,
            message: None,
        }
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl From<Rule> for Step {
    fn from(rule: Rule) -> Self {
        Self::new(rule)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Rule {
    /// Strip leading and trailing whitespace.
    Trim,
    /// Remove every non-digit character.
    DigitsOnly,
    /// Remove every character that is not an ASCII letter or digit.
    AlphanumericOnly,
    Uppercase,
    /// Collapse whitespace and capitalize each word.
    TitleCase {
        #[serde(default)]
        strip_diacritics: bool,
    },
    Required,
    ExactLength {
        len: usize,
    },
    MinLength {
        len: usize,
    },
    LengthBetween {
        min: usize,
        max: usize,
    },
    /// Case-insensitive regular expression match.
    Pattern {
        pattern: String,
    },
    /// Brazilian CPF check digits.
    CpfChecksum,
    /// Letters (including accented Latin), apostrophes and whitespace only.
    NameShape,
    /// At least a first name and a surname.
    FullName,
    /// `DD/MM/YYYY` shape, without calendar validation.
    DateShape,
    Email,
    /// Money amount greater than zero, rendered with two decimals.
    PositiveDecimal,
    /// Closed set, matched case-insensitively.
    OneOf {
        values: Vec<String>,
    },
}

impl Rule {
    /// True for steps that rewrite the value instead of checking it.
    pub fn is_transform(&self) -> bool {
        matches!(
            self,
            Self::Trim
                | Self::DigitsOnly
                | Self::AlphanumericOnly
                | Self::Uppercase
                | Self::TitleCase { .. }
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Trim => "trim",
            Self::DigitsOnly => "digits_only",
            Self::AlphanumericOnly => "alphanumeric_only",
            Self::Uppercase => "uppercase",
            Self::TitleCase { .. } => "title_case",
            Self::Required => "required",
            Self::ExactLength { .. } => "exact_length",
            Self::MinLength { .. } => "min_length",
            Self::LengthBetween { .. } => "length_between",
            Self::Pattern { .. } => "pattern",
            Self::CpfChecksum => "cpf_checksum",
            Self::NameShape => "name_shape",
            Self::FullName => "full_name",
            Self::DateShape => "date_shape",
            Self::Email => "email",
            Self::PositiveDecimal => "positive_decimal",
            Self::OneOf { .. } => "one_of",
        }
    }
}

/// Why a field value was rejected, independent of the display language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureKind {
    Required,
    Length { expected: usize, actual: usize },
    TooShort { min: usize, actual: usize },
    LengthOutOfRange { min: usize, max: usize, actual: usize },
    Pattern,
    CpfChecksum,
    NameShape,
    FullName,
    DateShape,
    Email,
    NotPositive,
    NotAllowed { allowed: Vec<String> },
}

impl FailureKind {
    /// Portuguese message shown when the screen configuration does not
    /// override it.
    pub fn default_message(&self, column: &str) -> String {
        match self {
            Self::Required => format!("{column} é obrigatório."),
            Self::Length { expected, .. } => {
                format!("{column} deve conter exatamente {expected} caracteres.")
            }
            Self::TooShort { min, .. } => {
                format!("{column} deve conter no mínimo {min} caracteres.")
            }
            Self::LengthOutOfRange { min, max, .. } => {
                format!("{column} deve conter entre {min} e {max} caracteres.")
            }
            Self::Pattern => format!("{column} em formato inválido."),
            Self::CpfChecksum => "CPF inválido.".to_string(),
            Self::NameShape => "Nome deve conter apenas letras e espaços.".to_string(),
            Self::FullName => "É necessário inserir o nome e sobrenome.".to_string(),
            Self::DateShape => "Data deve estar no formato DD/MM/AAAA.".to_string(),
            Self::Email => "E-mail inválido.".to_string(),
            Self::NotPositive => "Valor deve ser positivo.".to_string(),
            Self::NotAllowed { allowed } => {
                format!("{column} deve ser: {}.", join_alternatives(allowed))
            }
        }
    }
}

/// `["A", "B", "C"]` → `"A, B ou C"`.
fn join_alternatives(values: &[String]) -> String {
    match values {
        [] => String::new(),
        [single] => single.clone(),
        [init @ .., last] => format!("{} ou {last}", init.join(", ")),
    }
}
