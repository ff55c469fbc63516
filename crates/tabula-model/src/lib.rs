//! `tabula-model` defines the grid structures produced by importing a tabular file.
//!
//! It is shared by:
//! - the decoders in `tabula-io` (which build [`Workbook`]s)
//! - the import state machine in `tabula-import` (which normalizes and projects them)
//! - JSON boundaries via `serde` (JSON-safe schema)

mod assets;
mod coerce;
mod normalize;
mod value;
mod workbook;

pub use assets::{project_assets, AssetRecord, ASSET_LABEL_PREFIX};
pub use coerce::{coerce_cell, format_number};
pub use normalize::{normalize, normalize_workbook, GridSummary, NormalizedRow};
pub use value::RawCell;
pub use workbook::{RawRow, Sheet, Workbook};
