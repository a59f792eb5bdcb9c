//! Spreadsheet ingestion for operator uploads.
//!
//! Reads `.csv` (semicolon-delimited) and `.xlsx` (first sheet) files into a
//! [`Grid`](cardops_model::Grid) and locates the header row among banner and
//! instruction rows.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use cardops_ingest::{InstructionFilter, locate_header, read_grid};
//!
//! let grid = read_grid(Path::new("status.csv"))?;
//! let filter = InstructionFilter::new(["OBRIGATÓRIO", "Exemplo:"]);
//! let header = locate_header(&grid, &expected_columns, &filter)?;
//! ```

mod classify;
mod delimited;
mod error;
mod reader;
mod xlsx;

// === Error Types ===
pub use error::{IngestError, Result};

// === Reading ===
pub use delimited::{DELIMITER, parse_csv_bytes};
pub use reader::{MAX_FILE_SIZE, SpreadsheetFormat, parse_grid, read_grid, read_grid_from_bytes};
pub use xlsx::parse_xlsx_bytes;

// === Classification ===
pub use classify::{InstructionFilter, locate_header, matches_expected};
