use serde::{Deserialize, Serialize};

use crate::NormalizedRow;

/// Prefix of the label synthesized for rows without a name column.
pub const ASSET_LABEL_PREFIX: &str = "Asset";

/// A uniquely-keyed record projected from the first two columns of a row.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetRecord {
    /// `"<first column>-<source row index>"`.
    pub key: String,
    pub label: String,
}

impl AssetRecord {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
        }
    }
}

/// Project normalized rows into asset records.
///
/// The first row is treated as a header and skipped, as is any row whose first
/// column is blank. Keys embed the pre-filter source index, so two rows sharing
/// a first-column value still get distinct keys.
pub fn project_assets(rows: &[NormalizedRow]) -> Vec<AssetRecord> {
    rows.iter().skip(1).filter_map(project_row).collect()
}

fn project_row(row: &NormalizedRow) -> Option<AssetRecord> {
    let code = row.cell(0).trim();
    if code.is_empty() {
        return None;
    }

    let name = row.cell(1).trim();
    let label = if name.is_empty() {
        format!("{ASSET_LABEL_PREFIX} {code}")
    } else {
        name.to_string()
    };

    Some(AssetRecord {
        key: format!("{code}-{}", row.source_index),
        label,
    })
}
