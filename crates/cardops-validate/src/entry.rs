use std::collections::BTreeMap;

use cardops_model::ValidatedRecord;

use crate::company::CompanyContext;

/// One row of the staging table: company context plus a validated record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedEntry {
    pub company: CompanyContext,
    pub record: ValidatedRecord,
}

impl StagedEntry {
    pub fn new(company: CompanyContext, record: ValidatedRecord) -> Self {
        Self { company, record }
    }

    /// Record fields win over company fields with the same key.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.record.get(field).or_else(|| self.company.get(field))
    }

    pub fn merged(&self) -> BTreeMap<String, String> {
        let mut values = self.company.values().clone();
        values.extend(
            self.record
                .values()
                .iter()
                .map(|(key, value)| (key.clone(), value.clone())),
        );
        values
    }
}
