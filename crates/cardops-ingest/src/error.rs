//! Error types for spreadsheet ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort an import before any row is mapped.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Extension is neither `.csv` nor `.xlsx`.
    #[error("unsupported spreadsheet format: {name}")]
    UnsupportedFormat { name: String },

    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("file too large: {size} bytes (max {max_size})")]
    FileTooLarge { size: u64, max_size: u64 },

    // === Parsing Errors ===
    #[error("unsupported text encoding: {encoding}")]
    UnsupportedEncoding { encoding: &'static str },

    /// No bytes, or no rows after parsing.
    #[error("file is empty")]
    EmptyFile,

    #[error("failed to parse CSV line {line}: {message}")]
    CsvParse { line: usize, message: String },

    #[error("failed to open workbook: {message}")]
    Workbook { message: String },

    #[error("workbook has no sheets")]
    NoSheets,

    // === Classification Errors ===
    /// No row carries every expected column name outside instruction rows.
    #[error("header row not found, expected columns: {}", expected.join(", "))]
    HeaderNotFound { expected: Vec<String> },
}

impl IngestError {
    /// Portuguese message shown to the operator.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::UnsupportedFormat { .. } => {
                "Formato de arquivo inválido. Apenas arquivos .csv e .xlsx são aceitos.".to_string()
            }
            Self::FileNotFound { .. } | Self::FileRead { .. } => {
                "Falha ao ler o arquivo.".to_string()
            }
            Self::FileTooLarge { max_size, .. } => format!(
                "Arquivo muito grande. O tamanho máximo é {} MB.",
                max_size / (1024 * 1024)
            ),
            Self::UnsupportedEncoding { .. }
            | Self::EmptyFile
            | Self::CsvParse { .. }
            | Self::Workbook { .. }
            | Self::NoSheets => "Não foi possível ler o arquivo.".to_string(),
            Self::HeaderNotFound { .. } => {
                "Não foi possível encontrar o cabeçalho na planilha.".to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_failures_share_one_operator_message() {
        let unreadable = [
            IngestError::EmptyFile,
            IngestError::NoSheets,
            IngestError::CsvParse {
                line: 3,
                message: "bad".to_string(),
            },
        ];
        for err in unreadable {
            assert_eq!(err.user_message(), "Não foi possível ler o arquivo.");
        }
    }

    #[test]
    fn header_not_found_lists_columns_for_developers() {
        let err = IngestError::HeaderNotFound {
            expected: vec!["CPF".to_string(), "Nome Completo".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "header row not found, expected columns: CPF, Nome Completo"
        );
        assert!(err.user_message().contains("cabeçalho"));
    }
}
