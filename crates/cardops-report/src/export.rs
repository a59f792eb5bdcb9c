//! CSV export of the staging table.

use std::path::{Path, PathBuf};

use tracing::info;

use cardops_model::{CompanySpec, ScreenSpec};
use cardops_validate::{CompanyContext, StagedEntry};

use crate::common::{ExportError, encode_rows, write_file};

/// `{contrato}_{operation}.csv`
pub fn export_file_name(company: &CompanyContext, screen: &ScreenSpec) -> String {
    format!("{}_{}.csv", company.contract_number(), screen.operation)
}

/// Company columns, then the screen columns, then one row per entry in
/// table order.
pub fn render_export(
    company: &CompanySpec,
    screen: &ScreenSpec,
    entries: &[StagedEntry],
) -> Result<Vec<u8>, ExportError> {
    if entries.is_empty() {
        return Err(ExportError::EmptyTable);
    }
    let fields: Vec<_> = company.fields.iter().chain(&screen.fields).collect();
    let header: Vec<String> = fields.iter().map(|field| field.column.clone()).collect();
    let rows = entries.iter().map(|entry| {
        fields
            .iter()
            .map(|field| entry.get(&field.key).unwrap_or_default().to_string())
            .collect::<Vec<_>>()
    });
    encode_rows(std::iter::once(header).chain(rows))
}

/// Render the export and write it under `dir`.
pub fn write_export(
    dir: &Path,
    company_spec: &CompanySpec,
    company: &CompanyContext,
    screen: &ScreenSpec,
    entries: &[StagedEntry],
) -> Result<PathBuf, ExportError> {
    let bytes = render_export(company_spec, screen, entries)?;
    let path = write_file(dir, &export_file_name(company, screen), &bytes)?;
    info!(path = %path.display(), entries = entries.len(), "export written");
    Ok(path)
}
