use pretty_assertions::assert_eq;
use tabula_io::{decode, detect_format, DecodeError, TabularFormat};
use tabula_model::{normalize_workbook, project_assets, AssetRecord, RawCell};

fn texts(cells: &[&str]) -> Vec<RawCell> {
    cells
        .iter()
        .map(|s| {
            if s.is_empty() {
                RawCell::Empty
            } else {
                RawCell::from(*s)
            }
        })
        .collect()
}

#[test]
fn decodes_csv_without_type_inference() {
    let workbook = decode(b"col1,col2\n1.50,hello\n2,world\n").expect("decode csv");
    let sheet = workbook.first_sheet().expect("sheet");
    assert_eq!(
        sheet.rows,
        vec![
            texts(&["col1", "col2"]),
            texts(&["1.50", "hello"]),
            texts(&["2", "world"]),
        ]
    );
}

#[test]
fn ragged_rows_are_kept() {
    let workbook = decode(b"a,b,c\n1\n2,3\n").expect("decode csv");
    let sheet = workbook.first_sheet().expect("sheet");
    assert_eq!(
        sheet.rows,
        vec![texts(&["a", "b", "c"]), texts(&["1"]), texts(&["2", "3"])]
    );
}

#[test]
fn empty_payload_is_zero_rows() {
    let workbook = decode(b"").expect("decode empty payload");
    assert_eq!(workbook.sheets.len(), 1);
    assert!(normalize_workbook(&workbook).is_empty());
}

#[test]
fn blank_lines_keep_their_row_index() {
    let workbook = decode(b"Code,Name\n\n10,Valve\n,\n10,Gauge\n").expect("decode csv");
    let rows = normalize_workbook(&workbook);
    let indices: Vec<usize> = rows.iter().map(|r| r.source_index).collect();
    assert_eq!(indices, vec![0, 2, 4]);

    assert_eq!(
        project_assets(&rows),
        vec![
            AssetRecord::new("10-2", "Valve"),
            AssetRecord::new("10-4", "Gauge"),
        ]
    );
}

#[test]
fn quoted_fields_may_span_lines() {
    let workbook = decode(b"id,note\n1,\"first\n\nsecond\"\n2,plain\n").expect("decode csv");
    let sheet = workbook.first_sheet().expect("sheet");
    assert_eq!(
        sheet.rows,
        vec![
            texts(&["id", "note"]),
            texts(&["1", "first\n\nsecond"]),
            texts(&["2", "plain"]),
        ]
    );
}

#[test]
fn semicolon_separated_values() {
    let workbook = decode(b"Code;Name\n1;Pump\n").expect("decode csv");
    let sheet = workbook.first_sheet().expect("sheet");
    assert_eq!(sheet.rows, vec![texts(&["Code", "Name"]), texts(&["1", "Pump"])]);
}

#[test]
fn utf16le_tab_delimited_text() {
    // UTF-16LE with BOM, matching Excel's "Unicode Text" export.
    let tsv = "col1\tcol2\n1\thello\n";
    let mut bytes = vec![0xFF, 0xFE];
    for unit in tsv.encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }

    let workbook = decode(&bytes).expect("decode utf16 tsv");
    let sheet = workbook.first_sheet().expect("sheet");
    assert_eq!(
        sheet.rows,
        vec![texts(&["col1", "col2"]), texts(&["1", "hello"])]
    );
}

#[test]
fn utf8_bom_does_not_leak_into_first_cell() {
    let workbook = decode(b"\xEF\xBB\xBFid,text\n1,hello\n").expect("decode csv");
    let sheet = workbook.first_sheet().expect("sheet");
    assert_eq!(sheet.rows[0], texts(&["id", "text"]));
}

#[test]
fn windows_1252_fallback() {
    // "café" with Windows-1252 byte 0xE9 for "é" (invalid UTF-8).
    let workbook = decode(b"col1,col2\n1,caf\xe9\n").expect("decode csv");
    let sheet = workbook.first_sheet().expect("sheet");
    assert_eq!(sheet.rows[1], texts(&["1", "café"]));
}

#[test]
fn binary_payload_is_unrecognized() {
    let bytes = b"\x00\x01\x02\x03\x04\x05\n,\x06\x07";
    assert_eq!(detect_format(bytes), None);

    let err = decode(bytes).expect_err("binary should not decode");
    assert!(
        matches!(err, DecodeError::UnrecognizedFormat),
        "expected UnrecognizedFormat, got {err:?}"
    );
}

#[test]
fn format_is_sniffed_from_content() {
    assert_eq!(
        detect_format(b"col1,col2\n1,hello\n"),
        Some(TabularFormat::DelimitedText)
    );
}
