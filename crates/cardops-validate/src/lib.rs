//! Record schemas, field normalizers and batch validation.
//!
//! Screen configuration from `cardops-standards` is compiled into
//! [`RecordSchema`] values whose field pipelines run in order and stop at
//! the first failing step. Row failures are data ([`RowDiagnostic`]), not
//! errors; [`SchemaError`] only covers configuration that cannot compile.
//!
//! [`RowDiagnostic`]: cardops_model::RowDiagnostic

#![deny(unsafe_code)]

mod batch;
mod company;
mod entry;
mod error;
pub mod normalize;
mod schema;

pub use batch::{BatchOutcome, validate_batch};
pub use company::{CONTRACT_FIELD, CompanyContext, CompanySchema};
pub use entry::StagedEntry;
pub use error::SchemaError;
pub use schema::{FieldPipeline, RecordSchema};
