/// One parsed spreadsheet row. Cells are untyped text.
pub type Row = Vec<String>;

/// Rows of a single uploaded file, in file order.
///
/// Index `i` is the `i`-th line (CSV) or sheet row (XLSX), so blank lines
/// are kept as empty rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grid {
    rows: Vec<Row>,
}

impl Grid {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Widest row length.
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// True when every cell in the grid is blank after trimming.
    pub fn is_blank(&self) -> bool {
        self.rows.iter().all(|row| is_blank_row(row))
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }
}

impl From<Vec<Row>> for Grid {
    fn from(rows: Vec<Row>) -> Self {
        Self::new(rows)
    }
}

/// True when the row has no non-whitespace cell.
pub fn is_blank_row(row: &[String]) -> bool {
    row.iter().all(|cell| cell.trim().is_empty())
}
