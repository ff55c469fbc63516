use std::path::{Path, PathBuf};

use tabula_import::{AcquireError, AcquiredFile, Acquisition, FileAcquirer, MimeType, Payload};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

/// Picks the file named on the command line.
pub struct PathAcquirer {
    path: PathBuf,
    max_bytes: u64,
}

impl PathAcquirer {
    pub fn new(path: PathBuf, max_bytes: u64) -> Self {
        Self { path, max_bytes }
    }
}

impl FileAcquirer for PathAcquirer {
    async fn request(&mut self, allowed: &[MimeType]) -> Result<Acquisition, AcquireError> {
        read_file(&self.path, allowed, self.max_bytes).await
    }
}

/// Asks for a path on stdin. An empty answer (or EOF) cancels.
pub struct PromptAcquirer {
    max_bytes: u64,
}

impl PromptAcquirer {
    pub fn new(max_bytes: u64) -> Self {
        Self { max_bytes }
    }
}

impl FileAcquirer for PromptAcquirer {
    async fn request(&mut self, allowed: &[MimeType]) -> Result<Acquisition, AcquireError> {
        let mut stderr = tokio::io::stderr();
        stderr
            .write_all(b"Path to a spreadsheet or CSV file (empty to cancel): ")
            .await?;
        stderr.flush().await?;

        let mut line = String::new();
        BufReader::new(tokio::io::stdin()).read_line(&mut line).await?;
        let answer = line.trim();
        if answer.is_empty() {
            return Ok(Acquisition::Cancelled);
        }
        read_file(Path::new(answer), allowed, self.max_bytes).await
    }
}

async fn read_file(
    path: &Path,
    allowed: &[MimeType],
    max_bytes: u64,
) -> Result<Acquisition, AcquireError> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned());
    if let Some(name) = &file_name {
        if !MimeType::matches_any(allowed, name) {
            log::warn!("`{name}` does not have a spreadsheet or CSV extension; decoding by content");
        }
    }

    // Refuse oversized files before reading them into memory.
    let size = tokio::fs::metadata(path).await?.len();
    if size > max_bytes {
        return Err(AcquireError::PayloadTooLarge {
            size,
            limit: max_bytes,
        });
    }

    let bytes = tokio::fs::read(path).await?;
    Ok(Acquisition::Selected(AcquiredFile {
        file_name,
        payload: Payload::Bytes(bytes),
    }))
}
