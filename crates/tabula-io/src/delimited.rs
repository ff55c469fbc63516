use tabula_model::{RawCell, RawRow, Sheet};

use crate::text::decode_text;
use crate::DecodeError;

/// Delimiters considered by the sniffer, in tie-break order.
const CANDIDATE_DELIMITERS: [u8; 4] = [b',', b';', b'\t', b'|'];

/// Number of non-empty lines the delimiter sniffer samples.
const SNIFF_LINES: usize = 10;

/// Name given to the single sheet of a delimited payload.
pub(crate) const DELIMITED_SHEET_NAME: &str = "Sheet1";

/// Decode delimited text (CSV, TSV, ...) into a single sheet of text cells.
///
/// Fields are kept verbatim with no number/boolean inference. Empty fields
/// become [`RawCell::Empty`].
pub(crate) fn decode_delimited(bytes: &[u8]) -> Result<Sheet, DecodeError> {
    let (text, encoding) = decode_text(bytes)?;
    let delimiter = sniff_delimiter(&text);
    log::debug!(
        "delimited text: encoding={}, delimiter={:?}",
        encoding.name(),
        delimiter as char
    );

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        // Ragged rows are legal.
        .flexible(true)
        .from_reader(text.as_bytes());

    // The csv reader silently skips empty lines. Re-insert them as empty rows so
    // row indices line up with the lines a user sees in the file.
    let gaps = blank_lines_before_records(&text, delimiter);

    let mut sheet = Sheet::new(DELIMITED_SHEET_NAME);
    let mut record = csv::StringRecord::new();
    let mut record_index: usize = 0;
    loop {
        match reader.read_record(&mut record) {
            Ok(false) => break,
            Ok(true) => {
                let skipped = gaps.get(record_index).copied().unwrap_or(0);
                for _ in 0..skipped {
                    sheet.push_row(RawRow::new());
                }
                sheet.push_row(record.iter().map(field_to_cell).collect());
                record_index += 1;
            }
            Err(source) => {
                let row = source
                    .position()
                    .map(|p| p.record() + 1)
                    .unwrap_or(record_index as u64 + 1);
                return Err(DecodeError::Csv { row, source });
            }
        }
    }

    Ok(sheet)
}

fn field_to_cell(field: &str) -> RawCell {
    if field.is_empty() {
        RawCell::Empty
    } else {
        RawCell::Text(field.to_string())
    }
}

/// Pick the delimiter that splits the first lines most consistently.
///
/// A candidate that appears the same (non-zero) number of times on every sampled
/// line wins, preferring the one with more columns; otherwise the most frequent
/// candidate wins. Falls back to `,`.
fn sniff_delimiter(text: &str) -> u8 {
    let lines: Vec<&str> = text
        .lines()
        .filter(|l| !l.trim().is_empty())
        .take(SNIFF_LINES)
        .collect();
    if lines.is_empty() {
        return b',';
    }

    let mut best_consistent: Option<(u8, usize)> = None;
    let mut best_total: Option<(u8, usize)> = None;

    for delimiter in CANDIDATE_DELIMITERS {
        let counts: Vec<usize> = lines
            .iter()
            .map(|l| l.bytes().filter(|b| *b == delimiter).count())
            .collect();
        let total: usize = counts.iter().sum();
        if total == 0 {
            continue;
        }

        let first = counts[0];
        if first > 0 && counts.iter().all(|c| *c == first) {
            if best_consistent.map_or(true, |(_, n)| first > n) {
                best_consistent = Some((delimiter, first));
            }
        }
        if best_total.map_or(true, |(_, n)| total > n) {
            best_total = Some((delimiter, total));
        }
    }

    best_consistent
        .or(best_total)
        .map(|(delimiter, _)| delimiter)
        .unwrap_or(b',')
}

/// For each record the csv reader will produce, the number of empty lines that
/// precede it.
///
/// Mirrors the reader's quoting rules: a quote opens a quoted field only at the
/// start of a field, `""` inside a quoted field is an escaped quote, and line
/// terminators (`\n`, `\r`, `\r\n`) inside quotes are part of the field.
fn blank_lines_before_records(text: &str, delimiter: u8) -> Vec<usize> {
    let delimiter = delimiter as char;
    let mut gaps = Vec::new();
    let mut pending_blank = 0usize;
    let mut at_line_start = true;
    let mut at_field_start = true;
    let mut in_quotes = false;

    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            continue;
        }

        if ch == '\n' || ch == '\r' {
            if ch == '\r' && chars.peek() == Some(&'\n') {
                chars.next();
            }
            if at_line_start {
                pending_blank += 1;
            }
            at_line_start = true;
            at_field_start = true;
            continue;
        }

        if at_line_start {
            gaps.push(pending_blank);
            pending_blank = 0;
            at_line_start = false;
        }

        if ch == '"' && at_field_start {
            in_quotes = true;
            at_field_start = false;
        } else {
            at_field_start = ch == delimiter;
        }
    }

    gaps
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sniffs_common_delimiters() {
        assert_eq!(sniff_delimiter("a,b\n1,2\n"), b',');
        assert_eq!(sniff_delimiter("a;b;c\n1;2,5;3\n"), b';');
        assert_eq!(sniff_delimiter("a\tb\n1\t2\n"), b'\t');
        assert_eq!(sniff_delimiter("a|b\n"), b'|');
        assert_eq!(sniff_delimiter("single column\n"), b',');
        assert_eq!(sniff_delimiter(""), b',');
    }

    #[test]
    fn counts_blank_lines_between_records() {
        assert_eq!(blank_lines_before_records("a\n\n\nb\n", b','), vec![0, 2]);
        assert_eq!(blank_lines_before_records("\r\n\r\na\r\nb", b','), vec![2, 0]);
        assert_eq!(blank_lines_before_records("a\n\n", b','), vec![0]);
    }

    #[test]
    fn blank_lines_inside_quotes_are_field_content() {
        assert_eq!(
            blank_lines_before_records("\"x\n\ny\",1\n\nz,2\n", b','),
            vec![0, 1]
        );
        assert_eq!(
            blank_lines_before_records("a,\"say \"\"hi\"\"\n\n\"\nb\n", b','),
            vec![0, 0]
        );
    }

    #[test]
    fn mid_field_quote_is_literal() {
        assert_eq!(blank_lines_before_records("ab\"c\n\nd\n", b','), vec![0, 1]);
    }

    #[test]
    fn whitespace_only_line_is_a_record() {
        assert_eq!(blank_lines_before_records("a\n  \nb\n", b','), vec![0, 0, 0]);
    }
}
