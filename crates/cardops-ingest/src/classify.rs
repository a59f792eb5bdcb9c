//! Header and instruction-row detection.
//!
//! Operator spreadsheets carry a banner, a header, then instruction rows
//! ("OBRIGATÓRIO", "Exemplo: ...") before any data. Two predicates drive the
//! scan: a row is the header when its trimmed cells contain every expected
//! column name and it is not an instruction row. The first such row wins.

use std::collections::BTreeSet;

use tracing::debug;

use cardops_model::Grid;

use crate::error::{IngestError, Result};

/// Case-insensitive keyword test over whole rows.
#[derive(Debug, Clone, Default)]
pub struct InstructionFilter {
    keywords: Vec<String>,
}

impl InstructionFilter {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        Self { keywords }
    }

    /// True when any keyword occurs in the space-joined trimmed cells.
    pub fn is_instructional(&self, row: &[String]) -> bool {
        if self.keywords.is_empty() {
            return false;
        }
        let joined = row
            .iter()
            .map(|cell| cell.trim())
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();
        self.keywords.iter().any(|keyword| joined.contains(keyword))
    }
}

/// True when the trimmed cells include every expected column name.
pub fn matches_expected(row: &[String], expected: &[String]) -> bool {
    let cells: BTreeSet<&str> = row.iter().map(|cell| cell.trim()).collect();
    expected.iter().all(|column| cells.contains(column.trim()))
}

/// Index of the header row, or `HeaderNotFound`. There is no fallback row.
pub fn locate_header(grid: &Grid, expected: &[String], filter: &InstructionFilter) -> Result<usize> {
    let found = grid
        .rows()
        .iter()
        .position(|row| matches_expected(row, expected) && !filter.is_instructional(row));
    match found {
        Some(index) => {
            debug!(header_index = index, "header located");
            Ok(index)
        }
        None => Err(IngestError::HeaderNotFound {
            expected: expected.to_vec(),
        }),
    }
}
