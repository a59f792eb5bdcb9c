//! Sample spreadsheet layout handed to operators before an import.
//!
//! Layout, one entry per row:
//!
//! 1. banner: an empty cell followed by the screen title
//! 2. blank spacer
//! 3. header with every expected column name
//! 4. requirement labels (`OBRIGATÓRIO` / `OPCIONAL`)
//! 5. per-column guidance with an `Exemplo:` line
//!
//! Rows 4 and 5 carry the screen's instructional keywords, so feeding the
//! sample back through an import finds the header and no data rows.

use cardops_model::{Grid, Row, ScreenSpec};

pub fn sample_grid(screen: &ScreenSpec) -> Grid {
    let header: Row = screen.fields.iter().map(|f| f.column.clone()).collect();
    let requirements: Row = screen
        .fields
        .iter()
        .map(|f| f.requirement_label().to_string())
        .collect();
    let hints: Row = screen.fields.iter().map(|f| f.hint.clone()).collect();
    let banner = vec![String::new(), screen.title.clone()];

    let width = header.len().max(banner.len());
    let rows = vec![banner, Vec::new(), header, requirements, hints]
        .into_iter()
        .map(|row| pad(row, width))
        .collect();
    Grid::new(rows)
}

/// File name offered for the sample of `screen`.
pub fn sample_file_name(screen: &ScreenSpec) -> String {
    format!("exemplo_{}.csv", screen.operation)
}

fn pad(mut row: Row, width: usize) -> Row {
    row.resize(width, String::new());
    row
}
