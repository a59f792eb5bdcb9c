//! Positional pairing of data rows with header columns.

use tracing::{debug, trace};

use cardops_ingest::InstructionFilter;
use cardops_model::{FieldMapping, Grid, RawRecord, is_blank_row};

/// Field assigned to each header position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderLayout {
    slots: Vec<Option<String>>,
}

impl HeaderLayout {
    /// Resolve header cells against `mapping`. Unmapped columns get no slot;
    /// a column name repeated in the header only binds its first position.
    pub fn resolve(header: &[String], mapping: &FieldMapping) -> Self {
        let mut bound: Vec<&str> = Vec::new();
        let slots = header
            .iter()
            .map(|cell| {
                let field = mapping.field_for_column(cell.trim())?;
                if bound.contains(&field) {
                    return None;
                }
                bound.push(field);
                Some(field.to_string())
            })
            .collect();
        Self { slots }
    }

    /// Fields present in the header, in header order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().flatten().map(String::as_str)
    }

    fn record(&self, row: &[String], source_row: usize, mapping: &FieldMapping) -> RawRecord {
        let mut record = RawRecord::new(source_row);
        for (position, slot) in self.slots.iter().enumerate() {
            if let Some(field) = slot {
                let value = row.get(position).map_or("", |cell| cell.trim());
                record.values.insert(field.clone(), value.to_string());
            }
        }
        // Mapped fields whose column is absent from the header read as empty.
        for (field, _) in mapping.entries() {
            record.values.entry(field.clone()).or_default();
        }
        record
    }
}

/// Build raw records from every row after `header_index` that is neither an
/// instruction row nor blank.
///
/// `source_row` on each record is the 1-based file line, so the first row
/// after the header is `header_index + 2`.
pub fn map_rows(
    grid: &Grid,
    header_index: usize,
    mapping: &FieldMapping,
    filter: &InstructionFilter,
) -> Vec<RawRecord> {
    let Some(header) = grid.row(header_index) else {
        return Vec::new();
    };
    let layout = HeaderLayout::resolve(header, mapping);
    let mut records = Vec::new();
    for (index, row) in grid.rows().iter().enumerate().skip(header_index + 1) {
        if is_blank_row(row) {
            trace!(row = index + 1, "skipping blank row");
            continue;
        }
        if filter.is_instructional(row) {
            trace!(row = index + 1, "skipping instruction row");
            continue;
        }
        records.push(layout.record(row, index + 1, mapping));
    }
    debug!(
        header_index,
        mapped = records.len(),
        columns = layout.fields().count(),
        "mapped data rows"
    );
    records
}
