//! Classification of a whole upload into accepted entries and diagnostics.

use tracing::{debug, info_span};

use cardops_model::{RawRecord, RowDiagnostic};

use crate::company::CompanyContext;
use crate::entry::StagedEntry;
use crate::schema::RecordSchema;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Valid rows in file order, already merged with the company context.
    pub accepted: Vec<StagedEntry>,
    pub rejected: Vec<RowDiagnostic>,
}

impl BatchOutcome {
    pub fn accepted_count(&self) -> usize {
        self.accepted.len()
    }

    pub fn rejected_count(&self) -> usize {
        self.rejected.len()
    }
}

/// Validate every record against `schema`. Per-row failures become
/// diagnostics; they never abort the batch.
pub fn validate_batch(
    company: &CompanyContext,
    records: &[RawRecord],
    schema: &RecordSchema,
) -> BatchOutcome {
    let span = info_span!("validate_batch", schema = schema.name(), rows = records.len());
    let _guard = span.enter();

    let mut outcome = BatchOutcome::default();
    for raw in records {
        match schema.validate(raw) {
            Ok(record) => outcome
                .accepted
                .push(StagedEntry::new(company.clone(), record)),
            Err(issues) => {
                debug!(
                    row = raw.source_row,
                    failed_fields = issues.len(),
                    "row rejected"
                );
                outcome
                    .rejected
                    .push(RowDiagnostic::new(raw.source_row, issues));
            }
        }
    }
    debug!(
        accepted = outcome.accepted_count(),
        rejected = outcome.rejected_count(),
        "batch validated"
    );
    outcome
}
