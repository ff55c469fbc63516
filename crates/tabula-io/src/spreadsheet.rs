use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, ExcelDateTime, Reader};
use chrono::Timelike;
use tabula_model::{RawCell, RawRow, Sheet, Workbook};

use crate::{DecodeError, TabularFormat};

/// Decode a ZIP or OLE workbook.
///
/// Every sheet is listed, but only the first one has its cells decoded.
pub(crate) fn decode_spreadsheet(
    bytes: &[u8],
    format: TabularFormat,
) -> Result<Workbook, DecodeError> {
    let spreadsheet_error = |source| DecodeError::Spreadsheet { format, source };

    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(spreadsheet_error)?;
    let sheet_names = workbook.sheet_names().to_owned();

    let mut out = Workbook::new();
    let mut names = sheet_names.into_iter();
    let Some(first_name) = names.next() else {
        log::debug!("{format} workbook has no sheets");
        return Ok(out);
    };

    let range = workbook
        .worksheet_range(&first_name)
        .map_err(spreadsheet_error)?;
    let (row_offset, col_offset) = range.start().unwrap_or((0, 0));

    let mut sheet = Sheet::new(first_name);
    // Anchor the grid at A1 so row indices are sheet row numbers and column 0 is column A.
    for _ in 0..row_offset {
        sheet.push_row(RawRow::new());
    }
    for row in range.rows() {
        let mut cells = RawRow::with_capacity(col_offset as usize + row.len());
        cells.resize(col_offset as usize, RawCell::default());
        cells.extend(row.iter().map(convert_value));
        sheet.push_row(cells);
    }
    out.add_sheet(sheet);

    for name in names {
        log::info!("ignoring additional sheet `{name}`");
        out.add_sheet(Sheet::new(name));
    }

    Ok(out)
}

fn convert_value(value: &Data) -> RawCell {
    match value {
        Data::Empty => RawCell::Empty,
        Data::String(s) => RawCell::Text(s.clone()),
        Data::Float(f) => RawCell::Number(*f),
        Data::Int(i) => RawCell::Number(*i as f64),
        Data::Bool(b) => RawCell::Boolean(*b),
        Data::DateTime(dt) => convert_datetime(dt),
        // Excel error literals (`#DIV/0!`, `#N/A`, ...) and ISO date/duration strings
        // render as their text.
        other => RawCell::Text(other.to_string()),
    }
}

fn convert_datetime(dt: &ExcelDateTime) -> RawCell {
    if dt.is_duration() {
        return RawCell::Number(dt.as_f64());
    }
    match dt.as_datetime() {
        Some(datetime) if datetime.num_seconds_from_midnight() == 0 && datetime.nanosecond() == 0 => {
            RawCell::Text(datetime.format("%Y-%m-%d").to_string())
        }
        Some(datetime) => RawCell::Text(datetime.format("%Y-%m-%dT%H:%M:%S").to_string()),
        None => RawCell::Number(dt.as_f64()),
    }
}
