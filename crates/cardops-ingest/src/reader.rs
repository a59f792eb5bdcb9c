//! Format dispatch and file-level guards.

use std::path::Path;

use tracing::{debug, info_span};

use cardops_model::Grid;

use crate::delimited::parse_csv_bytes;
use crate::error::{IngestError, Result};
use crate::xlsx::parse_xlsx_bytes;

/// Maximum accepted upload size (20 MiB).
pub const MAX_FILE_SIZE: u64 = 20 * 1024 * 1024;

/// Spreadsheet formats accepted for import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpreadsheetFormat {
    Csv,
    Xlsx,
}

impl SpreadsheetFormat {
    /// Detect the format from a file name's extension, case-insensitively.
    pub fn from_file_name(name: &str) -> Result<Self> {
        let extension = Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("csv") => Ok(Self::Csv),
            Some("xlsx") => Ok(Self::Xlsx),
            _ => Err(IngestError::UnsupportedFormat {
                name: name.to_string(),
            }),
        }
    }
}

/// Read a spreadsheet from disk. The extension is checked before the file
/// is opened.
pub fn read_grid(path: &Path) -> Result<Grid> {
    let name = path.to_string_lossy();
    let format = SpreadsheetFormat::from_file_name(&name)?;
    check_file_size(path)?;
    let bytes = std::fs::read(path).map_err(|e| IngestError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_grid(format, &bytes)
}

/// Read an in-memory upload; `file_name` is only used for format detection.
pub fn read_grid_from_bytes(file_name: &str, bytes: &[u8]) -> Result<Grid> {
    let format = SpreadsheetFormat::from_file_name(file_name)?;
    if bytes.len() as u64 > MAX_FILE_SIZE {
        return Err(IngestError::FileTooLarge {
            size: bytes.len() as u64,
            max_size: MAX_FILE_SIZE,
        });
    }
    parse_grid(format, bytes)
}

pub fn parse_grid(format: SpreadsheetFormat, bytes: &[u8]) -> Result<Grid> {
    let span = info_span!("read_grid", ?format, bytes = bytes.len());
    let _guard = span.enter();
    let grid = match format {
        SpreadsheetFormat::Csv => parse_csv_bytes(bytes)?,
        SpreadsheetFormat::Xlsx => parse_xlsx_bytes(bytes)?,
    };
    if grid.is_empty() {
        return Err(IngestError::EmptyFile);
    }
    debug!(rows = grid.len(), width = grid.width(), "grid ready");
    Ok(grid)
}

fn check_file_size(path: &Path) -> Result<()> {
    let metadata = std::fs::metadata(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;
    if metadata.len() > MAX_FILE_SIZE {
        return Err(IngestError::FileTooLarge {
            size: metadata.len(),
            max_size: MAX_FILE_SIZE,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_detection_ignores_case() {
        assert_eq!(
            SpreadsheetFormat::from_file_name("Planilha.CSV").expect("csv"),
            SpreadsheetFormat::Csv
        );
        assert_eq!(
            SpreadsheetFormat::from_file_name("dados.XlSx").expect("xlsx"),
            SpreadsheetFormat::Xlsx
        );
    }

    #[test]
    fn other_extensions_are_rejected() {
        for name in ["dados.xls", "dados.txt", "dados", "csv"] {
            let err = SpreadsheetFormat::from_file_name(name).expect_err(name);
            assert!(matches!(err, IngestError::UnsupportedFormat { .. }));
        }
    }
}
