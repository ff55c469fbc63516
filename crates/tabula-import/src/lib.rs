//! One-at-a-time import of a user-selected tabular file.
//!
//! A [`FileAcquirer`] supplies the file, [`tabula_io::decode`] turns it into a
//! workbook, and [`tabula_model`] normalizes and projects the first sheet. The
//! [`ImportStateMachine`] tracks the lifecycle and rejects overlapping imports.

mod acquire;
mod config;
mod pipeline;
mod report;
mod state;

pub use acquire::{
    AcquireError, AcquiredFile, Acquisition, FileAcquirer, MimeType, Payload,
    SPREADSHEET_MIME_TYPES, UNTITLED_FILE_NAME,
};
pub use config::{
    ImportConfig, ProjectionMode, UnknownModeError, ACQUIRE_TIMEOUT_SECS_ENV_VAR,
    DEFAULT_MAX_PAYLOAD_BYTES, MAX_PAYLOAD_BYTES_ENV_VAR, MODE_ENV_VAR,
};
pub use pipeline::Importer;
pub use report::{ImportOutcome, ImportReport};
pub use state::{
    ImportData, ImportEvent, ImportPhase, ImportState, ImportStateMachine, TransitionError,
    IMPORT_LABEL, PROCESSING_LABEL,
};

/// Why an import ended in `Failed`. The `Display` text is the user-facing message.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("could not acquire the file: {0}")]
    Acquisition(#[from] AcquireError),
    #[error("could not import the file: {0}")]
    Decode(#[from] tabula_io::DecodeError),
}
