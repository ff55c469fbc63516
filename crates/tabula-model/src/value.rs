use serde::{Deserialize, Serialize};

/// A decoded cell value before coercion to text.
///
/// The enum uses an explicit `{type, value}` tagged layout for stable JSON.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum RawCell {
    /// Empty / missing cell.
    #[default]
    Empty,
    /// Plain text, exactly as stored in the source file.
    Text(String),
    /// IEEE-754 double precision number.
    Number(f64),
    /// Boolean.
    Boolean(bool),
}

impl From<f64> for RawCell {
    fn from(value: f64) -> Self {
        RawCell::Number(value)
    }
}

impl From<bool> for RawCell {
    fn from(value: bool) -> Self {
        RawCell::Boolean(value)
    }
}

impl From<String> for RawCell {
    fn from(value: String) -> Self {
        RawCell::Text(value)
    }
}

impl From<&str> for RawCell {
    fn from(value: &str) -> Self {
        RawCell::Text(value.to_string())
    }
}

impl<T: Into<RawCell>> From<Option<T>> for RawCell {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(RawCell::Empty)
    }
}
