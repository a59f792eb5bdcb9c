pub mod diagnostic;
pub mod grid;
pub mod record;
pub mod rules;
pub mod screen;

pub use diagnostic::{FieldIssue, RowDiagnostic};
pub use grid::{Grid, Row, is_blank_row};
pub use record::{RawRecord, ValidatedRecord};
pub use rules::{FailureKind, Rule, Step};
pub use screen::{CompanySpec, FieldMapping, FieldSpec, ScreenSpec};
