//! Errors raised while compiling screen configuration into pipelines.

use thiserror::Error;

/// Configuration that cannot be turned into executable pipelines.
///
/// Row-level failures are not errors; they are reported as
/// [`cardops_model::FieldIssue`] values.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("field {field}: invalid pattern: {source}")]
    Pattern {
        field: String,
        #[source]
        source: regex::Error,
    },

    #[error("company configuration has no {field} field")]
    MissingCompanyField { field: String },
}
