use serde::{Deserialize, Serialize};
use tabula_model::{project_assets, GridSummary, NormalizedRow};

use crate::{ImportData, ProjectionMode};

/// What a completed import hands to the presentation layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReport {
    pub file_name: String,
    pub data: ImportData,
    /// Retained rows, header included.
    pub row_count: usize,
    /// Width of the first retained row.
    pub column_count: usize,
}

impl ImportReport {
    pub fn build(file_name: String, rows: Vec<NormalizedRow>, mode: ProjectionMode) -> Self {
        let summary = GridSummary::of(&rows);
        let data = match mode {
            ProjectionMode::Rows => ImportData::Rows(rows),
            ProjectionMode::Assets => ImportData::Assets(project_assets(&rows)),
        };
        Self {
            file_name,
            data,
            row_count: summary.row_count,
            column_count: summary.column_count,
        }
    }
}

/// Result of one [`crate::Importer::run_import`] call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImportOutcome {
    Completed(ImportReport),
    /// The user dismissed the picker.
    Cancelled,
    /// The import failed; the message is also stored in the state machine.
    Failed(String),
    /// Another import was already in flight; nothing was attempted.
    Rejected,
}
