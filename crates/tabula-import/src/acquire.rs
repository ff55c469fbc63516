use std::fmt;
use std::future::Future;
use std::time::Duration;

use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD};
use base64::Engine as _;

/// Display name used when the picker does not report one.
pub const UNTITLED_FILE_NAME: &str = "Untitled file";

/// A MIME type offered to the file picker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MimeType(&'static str);

impl MimeType {
    pub const XLSX: MimeType =
        MimeType("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet");
    pub const XLS: MimeType = MimeType("application/vnd.ms-excel");
    pub const CSV: MimeType = MimeType("text/csv");

    /// File extensions a filesystem-backed picker associates with this type.
    pub fn extensions(self) -> &'static [&'static str] {
        match self.0 {
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet" => &["xlsx", "xlsm"],
            "application/vnd.ms-excel" => &["xls", "xlsb"],
            "text/csv" => &["csv", "tsv", "txt"],
            _ => &[],
        }
    }

    /// Whether `file_name` carries an extension associated with any of `allowed`.
    pub fn matches_any(allowed: &[MimeType], file_name: &str) -> bool {
        let Some((_, ext)) = file_name.rsplit_once('.') else {
            return false;
        };
        allowed
            .iter()
            .flat_map(|mime| mime.extensions())
            .any(|candidate| candidate.eq_ignore_ascii_case(ext))
    }
}

impl fmt::Display for MimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// The only types the import pipeline ever asks a picker for.
pub const SPREADSHEET_MIME_TYPES: [MimeType; 3] = [MimeType::XLSX, MimeType::XLS, MimeType::CSV];

#[derive(Debug, thiserror::Error)]
pub enum AcquireError {
    #[error("no file was selected")]
    NoFileResolved,
    #[error("failed to read file: {0}")]
    Read(#[from] std::io::Error),
    #[error("fetching the file failed with status {status}")]
    Fetch { status: u16 },
    #[error("timed out after {0:?} waiting for a file")]
    Timeout(Duration),
    #[error("file is {size} bytes, which exceeds the {limit} byte limit")]
    PayloadTooLarge { size: u64, limit: u64 },
    #[error("file contents are not valid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
}

/// File contents as handed over by a picker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Payload {
    Bytes(Vec<u8>),
    /// Base64 text, optionally prefixed with a `data:<mime>;base64,` URL header.
    Base64(String),
}

impl Payload {
    /// Resolve the payload to raw bytes, refusing anything larger than `limit`.
    pub fn into_bytes(self, limit: u64) -> Result<Vec<u8>, AcquireError> {
        let bytes = match self {
            Payload::Bytes(bytes) => bytes,
            Payload::Base64(text) => {
                let encoded = strip_data_url_prefix(text.trim());
                // Four base64 characters carry three bytes; refuse before allocating.
                let estimate = (encoded.len() as u64 / 4).saturating_mul(3);
                if estimate > limit {
                    return Err(AcquireError::PayloadTooLarge {
                        size: estimate,
                        limit,
                    });
                }
                STANDARD
                    .decode(encoded)
                    .or_else(|_| STANDARD_NO_PAD.decode(encoded))?
            }
        };

        let size = bytes.len() as u64;
        if size > limit {
            return Err(AcquireError::PayloadTooLarge { size, limit });
        }
        Ok(bytes)
    }
}

fn strip_data_url_prefix(text: &str) -> &str {
    if !text.starts_with("data:") {
        return text;
    }
    match text.split_once(',') {
        Some((header, body)) if header.ends_with(";base64") => body,
        _ => text,
    }
}

/// A file chosen by the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AcquiredFile {
    pub file_name: Option<String>,
    pub payload: Payload,
}

impl AcquiredFile {
    pub fn new(file_name: impl Into<String>, payload: Payload) -> Self {
        Self {
            file_name: Some(file_name.into()),
            payload,
        }
    }

    /// The reported name, or [`UNTITLED_FILE_NAME`] when it is missing or blank.
    pub fn display_name(&self) -> String {
        match self.file_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name.to_string(),
            _ => UNTITLED_FILE_NAME.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Acquisition {
    Selected(AcquiredFile),
    /// The user dismissed the picker. Not an error.
    Cancelled,
}

/// Source of user-selected files (a native dialog, a stdin prompt, a test script...).
///
/// The returned future covers both selecting the file and reading its contents.
pub trait FileAcquirer {
    fn request(
        &mut self,
        allowed: &[MimeType],
    ) -> impl Future<Output = Result<Acquisition, AcquireError>>;
}
