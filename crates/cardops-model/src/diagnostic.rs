use serde::{Deserialize, Serialize};

use crate::rules::FailureKind;

/// First failing step of one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldIssue {
    pub field: String,
    /// Spreadsheet column name shown to the operator.
    pub column: String,
    pub kind: FailureKind,
    /// Rendered operator-facing message.
    pub message: String,
}

impl FieldIssue {
    pub fn describe(&self) -> String {
        format!("Campo \"{}\": {}", self.column, self.message)
    }
}

/// Every field failure of one rejected row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowDiagnostic {
    /// 1-based line of the source file.
    pub row: usize,
    pub issues: Vec<FieldIssue>,
}

impl RowDiagnostic {
    pub fn new(row: usize, issues: Vec<FieldIssue>) -> Self {
        Self { row, issues }
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.issues.iter().map(|issue| issue.field.as_str())
    }

    /// `Linha 3: Campo "CPF": CPF inválido.; Campo "Nome Completo": ...`
    pub fn message(&self) -> String {
        let details = self
            .issues
            .iter()
            .map(FieldIssue::describe)
            .collect::<Vec<_>>()
            .join("; ");
        format!("Linha {}: {details}", self.row)
    }
}
