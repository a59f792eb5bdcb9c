//! Semicolon-delimited text reading.
//!
//! Blank lines are significant: a header located on line 5 must stay on
//! grid index 4 so diagnostics point at the line the operator sees. The `csv`
//! crate skips empty lines, so the text is first split into physical records
//! (newlines inside quotes do not split) and each record is parsed on its own.

use std::borrow::Cow;

use csv::ReaderBuilder;
use encoding_rs::WINDOWS_1252;
use tracing::{debug, warn};

use cardops_model::{Grid, Row};

use crate::error::{IngestError, Result};

/// Field delimiter used by the operator spreadsheets.
pub const DELIMITER: u8 = b';';

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

pub fn parse_csv_bytes(bytes: &[u8]) -> Result<Grid> {
    if bytes.is_empty() {
        return Err(IngestError::EmptyFile);
    }
    let text = decode(bytes)?;
    let mut rows = Vec::new();
    for (index, record) in split_records(&text).into_iter().enumerate() {
        rows.extend(parse_record(record, index + 1)?);
    }
    if rows.is_empty() {
        return Err(IngestError::EmptyFile);
    }
    debug!(rows = rows.len(), "parsed csv");
    Ok(Grid::new(rows))
}

/// UTF-8 (BOM stripped) with a Windows-1252 fallback.
fn decode(bytes: &[u8]) -> Result<Cow<'_, str>> {
    if bytes.starts_with(&[0xFF, 0xFE]) {
        return Err(IngestError::UnsupportedEncoding {
            encoding: "UTF-16 LE",
        });
    }
    if bytes.starts_with(&[0xFE, 0xFF]) {
        return Err(IngestError::UnsupportedEncoding {
            encoding: "UTF-16 BE",
        });
    }
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => Ok(Cow::Borrowed(text)),
        Err(error) => {
            warn!(
                valid_up_to = error.valid_up_to(),
                "csv is not valid UTF-8, decoding as windows-1252"
            );
            let (text, _had_errors) = WINDOWS_1252.decode_without_bom_handling(bytes);
            Ok(text)
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum QuoteState {
    FieldStart,
    Unquoted,
    Quoted,
    /// A `"` seen inside a quoted field: either an escaped quote or the end.
    QuoteInQuoted,
}

/// Split text into physical records. Only the chunk after a final line
/// terminator is dropped; interior blank lines are kept.
///
/// A `"` opens a quoted field only at the start of a field; elsewhere it is
/// a literal character, as the `csv` reader treats it.
pub(crate) fn split_records(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut records = Vec::new();
    let mut start = 0;
    let mut state = QuoteState::FieldStart;
    for (i, &byte) in bytes.iter().enumerate() {
        if state == QuoteState::Quoted {
            if byte == b'"' {
                state = QuoteState::QuoteInQuoted;
            }
            continue;
        }
        match byte {
            b'"' if state == QuoteState::FieldStart => state = QuoteState::Quoted,
            b'"' if state == QuoteState::QuoteInQuoted => state = QuoteState::Quoted,
            DELIMITER => state = QuoteState::FieldStart,
            b'\n' => {
                let end = if i > start && bytes[i - 1] == b'\r' {
                    i - 1
                } else {
                    i
                };
                records.push(&text[start..end]);
                start = i + 1;
                state = QuoteState::FieldStart;
            }
            b'\r' if bytes.get(i + 1) != Some(&b'\n') => {
                records.push(&text[start..i]);
                start = i + 1;
                state = QuoteState::FieldStart;
            }
            b'\r' => {}
            _ => state = QuoteState::Unquoted,
        }
    }
    if start < text.len() {
        records.push(&text[start..]);
    }
    records
}

fn parse_record(record: &str, line: usize) -> Result<Vec<Row>> {
    if record.is_empty() {
        return Ok(vec![Row::new()]);
    }
    let mut reader = ReaderBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(false)
        .flexible(true)
        .from_reader(record.as_bytes());
    let mut rows = Vec::new();
    for result in reader.records() {
        let parsed = result.map_err(|e| IngestError::CsvParse {
            line,
            message: e.to_string(),
        })?;
        rows.push(parsed.iter().map(normalize_cell).collect());
    }
    if rows.is_empty() {
        rows.push(Row::new());
    }
    Ok(rows)
}

fn normalize_cell(raw: &str) -> String {
    raw.trim_matches('\u{feff}').to_string()
}
