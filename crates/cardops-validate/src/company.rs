//! Company context: fields entered once per session.

use std::collections::BTreeMap;

use cardops_model::{CompanySpec, FieldIssue};

use crate::error::SchemaError;
use crate::schema::RecordSchema;

/// Field key of the contract number.
pub const CONTRACT_FIELD: &str = "numeroContrato";

/// Compiled pipelines of the company fields.
#[derive(Debug, Clone)]
pub struct CompanySchema {
    schema: RecordSchema,
}

impl CompanySchema {
    pub fn compile(spec: &CompanySpec) -> Result<Self, SchemaError> {
        if spec.field(CONTRACT_FIELD).is_none() {
            return Err(SchemaError::MissingCompanyField {
                field: CONTRACT_FIELD.to_string(),
            });
        }
        Ok(Self {
            schema: RecordSchema::from_fields("company", &spec.fields)?,
        })
    }

    pub fn schema(&self) -> &RecordSchema {
        &self.schema
    }

    /// Validate the operator's company inputs. This is the only way to
    /// obtain a [`CompanyContext`].
    pub fn validate(
        &self,
        inputs: &BTreeMap<String, String>,
    ) -> Result<CompanyContext, Vec<FieldIssue>> {
        let record = self.schema.validate_values(inputs)?;
        Ok(CompanyContext {
            values: record.values().clone(),
        })
    }
}

/// Validated company fields merged into every staged entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyContext {
    values: BTreeMap<String, String>,
}

impl CompanyContext {
    pub fn get(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }

    pub fn values(&self) -> &BTreeMap<String, String> {
        &self.values
    }

    pub fn contract_number(&self) -> &str {
        self.get(CONTRACT_FIELD).unwrap_or_default()
    }
}
