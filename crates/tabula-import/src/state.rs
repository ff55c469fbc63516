use std::fmt;

use serde::{Deserialize, Serialize};
use tabula_model::{AssetRecord, NormalizedRow};

/// Data produced by a successful import, shaped by [`crate::ProjectionMode`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportData {
    Rows(Vec<NormalizedRow>),
    Assets(Vec<AssetRecord>),
}

impl ImportData {
    pub fn len(&self) -> usize {
        match self {
            ImportData::Rows(rows) => rows.len(),
            ImportData::Assets(assets) => assets.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ImportState {
    #[default]
    Idle,
    Importing,
    Success { file_name: String, data: ImportData },
    Failed { message: String },
}

impl ImportState {
    pub fn phase(&self) -> ImportPhase {
        match self {
            ImportState::Idle => ImportPhase::Idle,
            ImportState::Importing => ImportPhase::Importing,
            ImportState::Success { .. } => ImportPhase::Success,
            ImportState::Failed { .. } => ImportPhase::Failed,
        }
    }
}

/// [`ImportState`] without its payload, for error reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImportPhase {
    Idle,
    Importing,
    Success,
    Failed,
}

impl fmt::Display for ImportPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ImportPhase::Idle => "idle",
            ImportPhase::Importing => "importing",
            ImportPhase::Success => "showing an imported file",
            ImportPhase::Failed => "showing an import error",
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImportEvent {
    Cancel,
    Succeed,
    Fail,
}

impl fmt::Display for ImportEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ImportEvent::Cancel => "cancel",
            ImportEvent::Succeed => "complete an import",
            ImportEvent::Fail => "fail an import",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("an import is already in progress")]
    ImportInFlight,
    #[error("cannot {event} while {from}")]
    InvalidTransition { from: ImportPhase, event: ImportEvent },
}

pub const IMPORT_LABEL: &str = "Import file";
pub const PROCESSING_LABEL: &str = "Processing...";

/// The single owner of import lifecycle state.
///
/// `Success` and `Failed` persist until the next [`begin`](Self::begin) (or a
/// [`clear`](Self::clear) of a `Success`). At most one import is in flight.
#[derive(Debug, Default)]
pub struct ImportStateMachine {
    state: ImportState,
    /// The `Success` that was showing when the current import began.
    previous: Option<(String, ImportData)>,
}

impl ImportStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ImportState {
        &self.state
    }

    pub fn is_importing(&self) -> bool {
        matches!(self.state, ImportState::Importing)
    }

    /// Whether a new import may start; hosts disable their import control otherwise.
    pub fn can_begin(&self) -> bool {
        !self.is_importing()
    }

    pub fn status_label(&self) -> &'static str {
        if self.is_importing() {
            PROCESSING_LABEL
        } else {
            IMPORT_LABEL
        }
    }

    pub fn file_name(&self) -> Option<&str> {
        match &self.state {
            ImportState::Success { file_name, .. } => Some(file_name),
            _ => None,
        }
    }

    pub fn data(&self) -> Option<&ImportData> {
        match &self.state {
            ImportState::Success { data, .. } => Some(data),
            _ => None,
        }
    }

    pub fn begin(&mut self) -> Result<(), TransitionError> {
        match std::mem::replace(&mut self.state, ImportState::Importing) {
            ImportState::Importing => Err(TransitionError::ImportInFlight),
            ImportState::Success { file_name, data } => {
                self.previous = Some((file_name, data));
                Ok(())
            }
            ImportState::Idle | ImportState::Failed { .. } => {
                self.previous = None;
                Ok(())
            }
        }
    }

    /// The user dismissed the picker: go back to whatever was showing before
    /// the import started, or `Idle`.
    pub fn cancel(&mut self) -> Result<(), TransitionError> {
        self.expect_importing(ImportEvent::Cancel)?;
        self.state = match self.previous.take() {
            Some((file_name, data)) => ImportState::Success { file_name, data },
            None => ImportState::Idle,
        };
        Ok(())
    }

    pub fn succeed(
        &mut self,
        file_name: impl Into<String>,
        data: ImportData,
    ) -> Result<(), TransitionError> {
        self.expect_importing(ImportEvent::Succeed)?;
        self.previous = None;
        self.state = ImportState::Success {
            file_name: file_name.into(),
            data,
        };
        Ok(())
    }

    pub fn fail(&mut self, message: impl Into<String>) -> Result<(), TransitionError> {
        self.expect_importing(ImportEvent::Fail)?;
        self.previous = None;
        self.state = ImportState::Failed {
            message: message.into(),
        };
        Ok(())
    }

    /// Discard imported data. Returns `false` (and changes nothing) unless a
    /// `Success` was showing.
    pub fn clear(&mut self) -> bool {
        if matches!(self.state, ImportState::Success { .. }) {
            self.state = ImportState::Idle;
            true
        } else {
            false
        }
    }

    fn expect_importing(&self, event: ImportEvent) -> Result<(), TransitionError> {
        if self.is_importing() {
            Ok(())
        } else {
            Err(TransitionError::InvalidTransition {
                from: self.state.phase(),
                event,
            })
        }
    }
}
