use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_PAYLOAD_BYTES: u64 = 64 * 1024 * 1024;

pub const MODE_ENV_VAR: &str = "TABULA_IMPORT_MODE";
pub const MAX_PAYLOAD_BYTES_ENV_VAR: &str = "TABULA_MAX_PAYLOAD_BYTES";
pub const ACQUIRE_TIMEOUT_SECS_ENV_VAR: &str = "TABULA_ACQUIRE_TIMEOUT_SECS";

/// Whether an import yields its filtered rows or asset records projected from them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectionMode {
    /// The filtered, stringified rows.
    #[default]
    Rows,
    /// `(key, label)` records projected from the first two columns.
    Assets,
}

impl fmt::Display for ProjectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ProjectionMode::Rows => "rows",
            ProjectionMode::Assets => "assets",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown import mode `{0}` (expected `rows` or `assets`)")]
pub struct UnknownModeError(String);

impl FromStr for ProjectionMode {
    type Err = UnknownModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rows" => Ok(ProjectionMode::Rows),
            "assets" => Ok(ProjectionMode::Assets),
            _ => Err(UnknownModeError(s.to_string())),
        }
    }
}

/// Import settings, fixed for the lifetime of an [`crate::Importer`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImportConfig {
    pub mode: ProjectionMode,
    pub max_payload_bytes: u64,
    /// Upper bound on selecting and reading a file. `None` waits indefinitely.
    #[serde(rename = "acquire_timeout_secs", with = "optional_secs")]
    pub acquire_timeout: Option<Duration>,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            mode: ProjectionMode::Rows,
            max_payload_bytes: DEFAULT_MAX_PAYLOAD_BYTES,
            acquire_timeout: None,
        }
    }
}

impl ImportConfig {
    /// Defaults with `TABULA_*` environment overrides applied.
    pub fn from_env() -> Self {
        Self::default().with_process_env()
    }

    /// Apply `TABULA_*` overrides from the process environment.
    pub fn with_process_env(self) -> Self {
        self.with_env_overrides(|name| std::env::var(name).ok())
    }

    /// Parse a JSON config document. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Apply overrides read through `lookup`. Unparseable values are logged and ignored.
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(raw) = lookup(MODE_ENV_VAR) {
            match raw.parse() {
                Ok(mode) => self.mode = mode,
                Err(err) => log::warn!("ignoring {MODE_ENV_VAR}: {err}"),
            }
        }

        if let Some(raw) = lookup(MAX_PAYLOAD_BYTES_ENV_VAR) {
            match raw.trim().parse::<u64>() {
                Ok(limit) if limit > 0 => self.max_payload_bytes = limit,
                _ => log::warn!("ignoring {MAX_PAYLOAD_BYTES_ENV_VAR}={raw:?}: expected a positive byte count"),
            }
        }

        if let Some(raw) = lookup(ACQUIRE_TIMEOUT_SECS_ENV_VAR) {
            match raw.trim().parse::<u64>() {
                Ok(0) => self.acquire_timeout = None,
                Ok(secs) => self.acquire_timeout = Some(Duration::from_secs(secs)),
                Err(_) => log::warn!("ignoring {ACQUIRE_TIMEOUT_SECS_ENV_VAR}={raw:?}: expected whole seconds"),
            }
        }

        self
    }
}

mod optional_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error> {
        value.map(|d| d.as_secs_f64()).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Duration>, D::Error> {
        Option::<f64>::deserialize(deserializer)?
            .filter(|secs| *secs != 0.0)
            .map(|secs| Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom))
            .transpose()
    }
}
