//! Decode an opaque tabular payload into a [`tabula_model::Workbook`].
//!
//! The format is always sniffed from the bytes, never from a file name:
//! - ZIP containers (`.xlsx` / `.xlsm` / `.xlsb` / `.ods`) and OLE compound files
//!   (legacy `.xls`) are read with `calamine`
//! - anything that looks like text is parsed as delimited text (CSV/TSV)

mod delimited;
mod format;
mod spreadsheet;
mod text;

use tabula_model::Workbook;

pub use format::{detect_format, TabularFormat};

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("payload is not a spreadsheet or delimited text file")]
    UnrecognizedFormat,
    #[error("failed to read {format} workbook: {source}")]
    Spreadsheet {
        format: TabularFormat,
        #[source]
        source: calamine::Error,
    },
    #[error("failed to parse delimited text at row {row}: {source}")]
    Csv {
        row: u64,
        #[source]
        source: csv::Error,
    },
    #[error("payload is not valid {encoding} text")]
    Encoding { encoding: &'static str },
}

/// Decode a payload into a workbook.
///
/// A payload without any rows decodes successfully to a workbook whose first
/// sheet is empty; only unparseable input is an error.
pub fn decode(bytes: &[u8]) -> Result<Workbook, DecodeError> {
    let format = detect_format(bytes).ok_or(DecodeError::UnrecognizedFormat)?;
    log::debug!("decoding {} byte payload as {format}", bytes.len());

    let workbook = match format {
        TabularFormat::Zip | TabularFormat::Cfb => spreadsheet::decode_spreadsheet(bytes, format)?,
        TabularFormat::DelimitedText => delimited::decode_delimited(bytes)?.into(),
    };

    if let Some(sheet) = workbook.first_sheet() {
        log::debug!(
            "decoded sheet `{}` with {} rows ({} sheets total)",
            sheet.name,
            sheet.row_count(),
            workbook.sheets.len()
        );
    }
    Ok(workbook)
}
