use std::fmt;

/// ZIP local file header (`PK\x03\x04`) or empty-archive end record (`PK\x05\x06`).
const ZIP_MAGIC: [&[u8]; 2] = [b"PK\x03\x04", b"PK\x05\x06"];

/// OLE Compound File Binary header (legacy BIFF `.xls`).
const CFB_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// How many leading bytes the text sniffer inspects.
const TEXT_SNIFF_LEN: usize = 8 * 1024;

/// Container family detected from the payload bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabularFormat {
    /// ZIP-based workbook (XLSX, XLSM, XLSB or ODS).
    Zip,
    /// OLE compound file (legacy XLS).
    Cfb,
    /// CSV, TSV or similar delimited text.
    DelimitedText,
}

impl fmt::Display for TabularFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TabularFormat::Zip => "zip",
            TabularFormat::Cfb => "ole",
            TabularFormat::DelimitedText => "delimited text",
        })
    }
}

/// Sniff the payload format from its leading bytes.
///
/// Returns `None` for binary data that is neither a known workbook container
/// nor plausible text. An empty payload counts as (empty) delimited text.
pub fn detect_format(bytes: &[u8]) -> Option<TabularFormat> {
    if ZIP_MAGIC.iter().any(|magic| bytes.starts_with(magic)) {
        return Some(TabularFormat::Zip);
    }
    if bytes.starts_with(CFB_MAGIC) {
        return Some(TabularFormat::Cfb);
    }
    looks_like_text(bytes).then_some(TabularFormat::DelimitedText)
}

fn looks_like_text(bytes: &[u8]) -> bool {
    // UTF-16 text is full of NUL bytes; trust an explicit BOM.
    if bytes.starts_with(&[0xFF, 0xFE]) || bytes.starts_with(&[0xFE, 0xFF]) {
        return true;
    }

    let sample = &bytes[..bytes.len().min(TEXT_SNIFF_LEN)];
    if sample.contains(&0) {
        return false;
    }

    let control = sample
        .iter()
        .filter(|b| (**b < 0x20 && !matches!(**b, b'\t' | b'\n' | b'\r' | 0x0C)) || **b == 0x7F)
        .count();
    // More than 5% control bytes is not something a person typed.
    control * 20 <= sample.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sniffs_containers_by_magic() {
        assert_eq!(detect_format(b"PK\x03\x04rest"), Some(TabularFormat::Zip));
        assert_eq!(detect_format(b"PK\x05\x06"), Some(TabularFormat::Zip));
        assert_eq!(
            detect_format(&[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1, 0x00]),
            Some(TabularFormat::Cfb)
        );
    }

    #[test]
    fn sniffs_text() {
        assert_eq!(
            detect_format(b"col1,col2\n1,hello\n"),
            Some(TabularFormat::DelimitedText)
        );
        assert_eq!(detect_format(b""), Some(TabularFormat::DelimitedText));
        assert_eq!(
            detect_format(&[0xFF, 0xFE, b'a', 0x00]),
            Some(TabularFormat::DelimitedText)
        );
        // Windows-1252 "café" is not UTF-8 but still text.
        assert_eq!(detect_format(b"caf\xe9"), Some(TabularFormat::DelimitedText));
    }

    #[test]
    fn rejects_binary() {
        assert_eq!(detect_format(b"\x00\x01\x02\x03\x04\x05\n,\x06\x07"), None);
        assert_eq!(detect_format(b"\x01\x02\x03\x04\x05\x06\x07\x08abc"), None);
    }
}
