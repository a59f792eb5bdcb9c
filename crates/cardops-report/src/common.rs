//! Shared CSV writer settings for generated files.

use std::fs;
use std::path::{Path, PathBuf};

use csv::{QuoteStyle, Terminator, WriterBuilder};
use thiserror::Error;

/// Field separator of every generated file.
pub const DELIMITER: u8 = b';';

/// UTF-8 byte order mark; spreadsheet programs need it to pick UTF-8.
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("staging table is empty")]
    EmptyTable,

    #[error("failed to encode CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to finish CSV buffer: {0}")]
    Buffer(#[source] std::io::Error),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ExportError {
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::EmptyTable => "Não há dados na tabela para baixar.",
            Self::Csv(_) | Self::Buffer(_) | Self::Write { .. } => {
                "Não foi possível gerar o arquivo."
            }
        }
    }
}

/// Encode rows as `;`-separated CSV with BOM and CRLF line endings.
/// Cells holding `;`, quotes or line breaks are quoted.
pub fn encode_rows<I, R, S>(rows: I) -> Result<Vec<u8>, ExportError>
where
    I: IntoIterator<Item = R>,
    R: IntoIterator<Item = S>,
    S: AsRef<[u8]>,
{
    let mut writer = WriterBuilder::new()
        .delimiter(DELIMITER)
        .terminator(Terminator::CRLF)
        .quote_style(QuoteStyle::Necessary)
        .flexible(true)
        .from_writer(UTF8_BOM.to_vec());
    for row in rows {
        writer.write_record(row)?;
    }
    writer
        .into_inner()
        .map_err(|err| ExportError::Buffer(err.into_error()))
}

/// Write `bytes` to `dir/file_name`, creating `dir` when missing.
pub fn write_file(dir: &Path, file_name: &str, bytes: &[u8]) -> Result<PathBuf, ExportError> {
    let path = dir.join(file_name);
    fs::create_dir_all(dir).map_err(|source| ExportError::Write {
        path: dir.to_path_buf(),
        source,
    })?;
    fs::write(&path, bytes).map_err(|source| ExportError::Write {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}
