use std::io::{self, Write};

use tabula_import::{ImportData, ImportReport};
use tabula_model::{AssetRecord, NormalizedRow};

pub const NO_DATA_MESSAGE: &str = "No data imported yet.";

const CELL_SEPARATOR: &str = " | ";

pub fn write_text(out: &mut impl Write, report: &ImportReport) -> io::Result<()> {
    writeln!(out, "File: {}", report.file_name)?;
    writeln!(
        out,
        "{} rows x {} columns",
        report.row_count, report.column_count
    )?;

    if report.data.is_empty() {
        return writeln!(out, "{NO_DATA_MESSAGE}");
    }
    match &report.data {
        ImportData::Rows(rows) => write_rows(out, rows),
        ImportData::Assets(assets) => write_assets(out, assets),
    }
}

pub fn write_json(out: &mut impl Write, report: &ImportReport) -> io::Result<()> {
    serde_json::to_writer(&mut *out, report)?;
    out.write_all(b"\n")
}

fn write_rows(out: &mut impl Write, rows: &[NormalizedRow]) -> io::Result<()> {
    for (idx, row) in rows.iter().enumerate() {
        writeln!(out, "{}: {}", idx + 1, row.cells.join(CELL_SEPARATOR))?;
    }
    Ok(())
}

fn write_assets(out: &mut impl Write, assets: &[AssetRecord]) -> io::Result<()> {
    let key_width = assets.iter().map(|a| a.key.chars().count()).max().unwrap_or(0);
    for asset in assets {
        writeln!(out, "{:<key_width$}  {}", asset.key, asset.label)?;
    }
    Ok(())
}
