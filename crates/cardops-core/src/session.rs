//! One operator session on one screen.
//!
//! The session owns the company inputs, the staging table and the upload
//! lock. File imports go through [`ImportSession::begin_upload`] and
//! [`ImportSession::complete_upload`]; the table is only mutated once a whole
//! file has been read, classified, mapped and validated.

use std::collections::BTreeMap;
use std::path::Path;

use thiserror::Error;
use tracing::{info, info_span, warn};

use cardops_ingest::{
    IngestError, InstructionFilter, locate_header, read_grid, read_grid_from_bytes,
};
use cardops_map::map_rows;
use cardops_model::{CompanySpec, FieldIssue, FieldMapping, Grid, RowDiagnostic, ScreenSpec};
use cardops_standards::{ScreenRegistry, StandardsError};
use cardops_validate::{
    CompanyContext, CompanySchema, RecordSchema, SchemaError, StagedEntry, validate_batch,
};

use crate::staging::{StagingError, StagingTable};
use crate::submit::{Payload, SubmitError, Submitter};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Standards(#[from] StandardsError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    /// Company inputs failed validation when an upload started.
    #[error("company context invalid before upload")]
    CompanyRequiredForUpload { issues: Vec<FieldIssue> },

    /// Company inputs failed validation when a submission started.
    #[error("company context invalid before submit")]
    CompanyRequiredForSubmit { issues: Vec<FieldIssue> },

    #[error("no data rows after the header")]
    NoDataRows,

    #[error("an upload is already in progress")]
    UploadInProgress,

    #[error("upload ticket {id} is not the pending upload")]
    UnknownUpload { id: u64 },

    /// Manual entry rejected; messages keyed by field.
    #[error("entry has {} invalid field(s)", errors.len())]
    InvalidEntry { errors: BTreeMap<String, String> },

    #[error("staging table is empty")]
    EmptyTable,

    #[error(transparent)]
    Staging(#[from] StagingError),

    #[error(transparent)]
    Submit(#[from] SubmitError),
}

impl SessionError {
    /// Portuguese message shown to the operator.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Ingest(err) => err.user_message(),
            Self::CompanyRequiredForUpload { .. } => {
                "Por favor, preencha o N° do contrato antes de fazer o upload do arquivo."
                    .to_string()
            }
            Self::CompanyRequiredForSubmit { .. } => {
                "Por favor, preencha o N° do contrato antes de enviar para a API.".to_string()
            }
            Self::NoDataRows => "Nenhum registro encontrado na planilha.".to_string(),
            Self::UploadInProgress => {
                "Aguarde o término do upload em andamento.".to_string()
            }
            Self::InvalidEntry { .. } => "Corrija os campos destacados.".to_string(),
            Self::EmptyTable => "Não há dados na tabela para enviar.".to_string(),
            Self::Submit(err) => err.user_message().to_string(),
            Self::Standards(_) | Self::Schema(_) | Self::UnknownUpload { .. } | Self::Staging(_) => {
                "Ocorreu um erro inesperado.".to_string()
            }
        }
    }

    /// Field-level messages for inline display, when the error has any.
    pub fn field_messages(&self) -> BTreeMap<String, String> {
        match self {
            Self::CompanyRequiredForUpload { issues } | Self::CompanyRequiredForSubmit { issues } => {
                issue_map(issues)
            }
            Self::InvalidEntry { errors } => errors.clone(),
            _ => BTreeMap::new(),
        }
    }
}

fn issue_map(issues: &[FieldIssue]) -> BTreeMap<String, String> {
    issues
        .iter()
        .map(|issue| (issue.field.clone(), issue.message.clone()))
        .collect()
}

/// Exclusive right to complete one upload.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "an upload ticket must be completed or abandoned"]
pub struct UploadTicket {
    id: u64,
}

impl UploadTicket {
    pub fn id(&self) -> u64 {
        self.id
    }
}

/// Result of one successful import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportReport {
    pub header_index: usize,
    /// Data rows found after the header.
    pub rows: usize,
    pub accepted: usize,
    pub rejected: Vec<RowDiagnostic>,
}

impl ImportReport {
    pub fn success_message(&self) -> Option<String> {
        (self.accepted > 0)
            .then(|| format!("Total de {} registros válidos foram importados.", self.accepted))
    }

    pub fn error_messages(&self) -> Vec<String> {
        self.rejected.iter().map(RowDiagnostic::message).collect()
    }
}

pub struct ImportSession {
    screen: ScreenSpec,
    mapping: FieldMapping,
    filter: InstructionFilter,
    schema: RecordSchema,
    company_schema: CompanySchema,
    company_inputs: BTreeMap<String, String>,
    table: StagingTable,
    pending_upload: Option<u64>,
    next_ticket: u64,
}

impl ImportSession {
    pub fn new(company: &CompanySpec, screen: &ScreenSpec) -> Result<Self, SessionError> {
        Ok(Self {
            mapping: screen.mapping(),
            filter: InstructionFilter::new(&screen.keywords),
            schema: RecordSchema::compile(screen)?,
            company_schema: CompanySchema::compile(company)?,
            screen: screen.clone(),
            company_inputs: BTreeMap::new(),
            table: StagingTable::new(),
            pending_upload: None,
            next_ticket: 1,
        })
    }

    /// Open a session on a screen of `registry`.
    pub fn open(registry: &ScreenRegistry, screen_id: &str) -> Result<Self, SessionError> {
        Self::new(registry.company(), registry.screen(screen_id)?)
    }

    pub fn screen(&self) -> &ScreenSpec {
        &self.screen
    }

    pub fn schema(&self) -> &RecordSchema {
        &self.schema
    }

    pub fn table(&self) -> &StagingTable {
        &self.table
    }

    pub fn company_inputs(&self) -> &BTreeMap<String, String> {
        &self.company_inputs
    }

    pub fn set_company_field(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.company_inputs.insert(key.into(), value.into());
    }

    pub fn company_context(&self) -> Result<CompanyContext, Vec<FieldIssue>> {
        self.company_schema.validate(&self.company_inputs)
    }

    pub fn upload_pending(&self) -> bool {
        self.pending_upload.is_some()
    }

    /// Reserve the session for one upload. The company context must be
    /// valid before any file is read.
    pub fn begin_upload(&mut self) -> Result<UploadTicket, SessionError> {
        if self.pending_upload.is_some() {
            return Err(SessionError::UploadInProgress);
        }
        self.company_context()
            .map_err(|issues| SessionError::CompanyRequiredForUpload { issues })?;
        let id = self.next_ticket;
        self.next_ticket += 1;
        self.pending_upload = Some(id);
        Ok(UploadTicket { id })
    }

    /// Release the upload lock after a failed read.
    pub fn abandon_upload(&mut self, ticket: UploadTicket) -> Result<(), SessionError> {
        self.redeem(ticket)
    }

    /// Classify, map and validate `grid`, then append accepted rows.
    ///
    /// Structural failures leave the staging table untouched.
    pub fn complete_upload(
        &mut self,
        ticket: UploadTicket,
        grid: &Grid,
    ) -> Result<ImportReport, SessionError> {
        self.redeem(ticket)?;
        let span = info_span!("import", screen = %self.screen.id, rows = grid.len());
        let _guard = span.enter();

        let company = self
            .company_context()
            .map_err(|issues| SessionError::CompanyRequiredForUpload { issues })?;
        let header_index = locate_header(grid, &self.screen.expected_columns(), &self.filter)?;
        let records = map_rows(grid, header_index, &self.mapping, &self.filter);
        if records.is_empty() {
            return Err(SessionError::NoDataRows);
        }

        let outcome = validate_batch(&company, &records, &self.schema);
        let accepted = self.table.append_all(outcome.accepted);
        info!(
            header_index,
            accepted,
            rejected = outcome.rejected.len(),
            staged = self.table.len(),
            "import finished"
        );
        Ok(ImportReport {
            header_index,
            rows: records.len(),
            accepted,
            rejected: outcome.rejected,
        })
    }

    pub fn import_path(&mut self, path: &Path) -> Result<ImportReport, SessionError> {
        let ticket = self.begin_upload()?;
        match read_grid(path) {
            Ok(grid) => self.complete_upload(ticket, &grid),
            Err(err) => {
                self.abandon_upload(ticket)?;
                Err(err.into())
            }
        }
    }

    pub fn import_bytes(
        &mut self,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<ImportReport, SessionError> {
        let ticket = self.begin_upload()?;
        match read_grid_from_bytes(file_name, bytes) {
            Ok(grid) => self.complete_upload(ticket, &grid),
            Err(err) => {
                self.abandon_upload(ticket)?;
                Err(err.into())
            }
        }
    }

    /// Validate a manually entered record together with the company inputs
    /// and save it: replacing the edited entry, or appending.
    pub fn register(&mut self, form: &BTreeMap<String, String>) -> Result<usize, SessionError> {
        let company = self.company_context();
        let record = self.schema.validate_values(form);
        match (company, record) {
            (Ok(company), Ok(record)) => {
                let index = self.table.save(StagedEntry::new(company, record));
                info!(index, staged = self.table.len(), "entry saved");
                Ok(index)
            }
            (company, record) => {
                let mut errors = BTreeMap::new();
                if let Err(issues) = company {
                    errors.extend(issue_map(&issues));
                }
                if let Err(issues) = record {
                    errors.extend(issue_map(&issues));
                }
                Err(SessionError::InvalidEntry { errors })
            }
        }
    }

    /// Load entry `index` for editing. Its company fields replace the
    /// current company inputs; the returned map fills the record form.
    pub fn edit(&mut self, index: usize) -> Result<BTreeMap<String, String>, SessionError> {
        let entry = self.table.begin_edit(index)?;
        let form = entry.record.values().clone();
        self.company_inputs = entry.company.values().clone();
        Ok(form)
    }

    pub fn cancel_edit(&mut self) {
        self.table.cancel_edit();
    }

    pub fn remove(&mut self, index: usize) -> Result<(), SessionError> {
        self.table.remove_at(index)?;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Build the submission body from the current company inputs and every
    /// staged entry, keeping only the screen's field keys.
    pub fn payload(&self) -> Result<Payload, SessionError> {
        let company = self
            .company_context()
            .map_err(|issues| SessionError::CompanyRequiredForSubmit { issues })?;
        if self.table.is_empty() {
            return Err(SessionError::EmptyTable);
        }
        let value = self
            .table
            .entries()
            .iter()
            .map(|entry| {
                self.schema
                    .field_keys()
                    .map(|key| {
                        (
                            key.to_string(),
                            entry.get(key).unwrap_or_default().to_string(),
                        )
                    })
                    .collect()
            })
            .collect();
        Ok(Payload {
            contrato: company.contract_number().to_string(),
            op: self.screen.operation.clone(),
            value,
        })
    }

    /// Send the staging table. A failed submission keeps every entry.
    pub fn submit(&self, submitter: &dyn Submitter) -> Result<usize, SessionError> {
        let payload = self.payload()?;
        if let Err(err) = submitter.submit(&payload) {
            warn!(error = %err, "submission failed");
            return Err(err.into());
        }
        Ok(payload.len())
    }

    fn redeem(&mut self, ticket: UploadTicket) -> Result<(), SessionError> {
        let UploadTicket { id } = ticket;
        if self.pending_upload != Some(id) {
            return Err(SessionError::UnknownUpload { id });
        }
        self.pending_upload = None;
        Ok(())
    }
}
