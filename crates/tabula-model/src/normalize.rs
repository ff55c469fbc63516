use serde::{Deserialize, Serialize};

use crate::{coerce_cell, RawCell, Sheet, Workbook};

/// A retained row with every cell coerced to text.
///
/// `source_index` is the zero-based position of the row in the decoded sheet
/// *before* blank rows were dropped. Asset keys embed it, so it must survive
/// filtering even though the output sequence is renumbered.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedRow {
    pub source_index: usize,
    pub cells: Vec<String>,
}

impl NormalizedRow {
    pub fn new(source_index: usize, cells: Vec<String>) -> Self {
        Self {
            source_index,
            cells,
        }
    }

    /// Cell text at `col`, or `""` past the end of a ragged row.
    pub fn cell(&self, col: usize) -> &str {
        self.cells.get(col).map(String::as_str).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// True if at least one cell is non-blank after trimming.
    pub fn has_content(&self) -> bool {
        self.cells.iter().any(|c| !c.trim().is_empty())
    }
}

/// Coerce a sheet to text and drop blank rows.
///
/// A row is retained iff at least one coerced cell is non-empty after trimming.
/// Retention is decided per row, independently of every other row.
pub fn normalize(sheet: &Sheet) -> Vec<NormalizedRow> {
    sheet
        .rows
        .iter()
        .enumerate()
        .filter_map(|(source_index, row)| normalize_row(source_index, row))
        .collect()
}

/// Normalize the first sheet of a workbook. Later sheets are ignored.
pub fn normalize_workbook(workbook: &Workbook) -> Vec<NormalizedRow> {
    workbook.first_sheet().map(normalize).unwrap_or_default()
}

fn normalize_row(source_index: usize, row: &[RawCell]) -> Option<NormalizedRow> {
    let row = NormalizedRow::new(source_index, row.iter().map(coerce_cell).collect());
    row.has_content().then_some(row)
}

/// Row/column counts reported alongside an import.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSummary {
    pub row_count: usize,
    /// Width of the first retained row (the header, when there is one).
    pub column_count: usize,
}

impl GridSummary {
    pub fn of(rows: &[NormalizedRow]) -> Self {
        Self {
            row_count: rows.len(),
            column_count: rows.first().map(NormalizedRow::len).unwrap_or(0),
        }
    }
}
