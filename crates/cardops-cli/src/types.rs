use std::collections::BTreeMap;
use std::path::PathBuf;

use cardops_core::ImportReport;

pub struct ImportResult {
    pub screen: String,
    pub contract: String,
    pub files: Vec<FileSummary>,
    pub staged: usize,
    pub export: Option<ExportOutcome>,
    pub submission: Option<SubmissionOutcome>,
}

impl ImportResult {
    /// Any file that could not be imported, or a failed export or submission.
    pub fn has_errors(&self) -> bool {
        self.files
            .iter()
            .any(|file| matches!(file.outcome, FileOutcome::Failed { .. }))
            || matches!(self.export, Some(ExportOutcome::Failed { .. }))
            || matches!(self.submission, Some(SubmissionOutcome::Failed { .. }))
    }

    pub fn rejected_rows(&self) -> usize {
        self.files
            .iter()
            .filter_map(|file| match &file.outcome {
                FileOutcome::Imported(report) => Some(report.rejected.len()),
                FileOutcome::Failed { .. } => None,
            })
            .sum()
    }
}

pub struct FileSummary {
    pub path: PathBuf,
    pub outcome: FileOutcome,
}

pub enum FileOutcome {
    Imported(ImportReport),
    Failed { message: String, detail: String },
}

pub enum ExportOutcome {
    Written(PathBuf),
    Failed { message: String },
}

pub enum SubmissionOutcome {
    Sent { records: usize },
    DryRun { payload: String },
    Failed { message: String, detail: String },
}

/// Outcome of validating one manually entered record.
pub enum RecordResult {
    Valid(BTreeMap<String, String>),
    Invalid(BTreeMap<String, String>),
}
