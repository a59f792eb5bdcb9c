//! First-sheet XLSX reading.

use std::io::Cursor;

use calamine::{Data, Reader, Xlsx};
use chrono::Datelike;
use tracing::debug;

use cardops_model::{Grid, Row};

use crate::error::{IngestError, Result};

pub fn parse_xlsx_bytes(bytes: &[u8]) -> Result<Grid> {
    if bytes.is_empty() {
        return Err(IngestError::EmptyFile);
    }
    let mut workbook = Xlsx::new(Cursor::new(bytes)).map_err(|e| IngestError::Workbook {
        message: e.to_string(),
    })?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(IngestError::NoSheets)?
        .map_err(|e| IngestError::Workbook {
            message: e.to_string(),
        })?;

    // The used range may start below A1; restore the skipped rows and columns
    // so grid indices equal sheet rows.
    let Some((first_row, first_col)) = range.start() else {
        return Err(IngestError::EmptyFile);
    };
    let mut rows: Vec<Row> = vec![Row::new(); first_row as usize];
    for cells in range.rows() {
        let mut row = vec![String::new(); first_col as usize];
        row.extend(cells.iter().map(render_cell));
        rows.push(row);
    }
    debug!(rows = rows.len(), first_row, first_col, "parsed xlsx");
    Ok(Grid::new(rows))
}

fn render_cell(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => render_float(*f),
        Data::Bool(true) => "TRUE".to_string(),
        Data::Bool(false) => "FALSE".to_string(),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(value) => format!(
                "{:02}/{:02}/{:04}",
                value.day(),
                value.month(),
                value.year()
            ),
            None => render_float(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => e.to_string(),
    }
}

fn render_float(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        (value as i64).to_string()
    } else {
        value.to_string()
    }
}
