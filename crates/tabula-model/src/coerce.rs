use crate::RawCell;

/// Significant digits kept when rendering numbers.
///
/// Spreadsheet applications store 15 significant decimal digits; anything past
/// that in an `f64` is binary noise (`0.1 + 0.2`).
const SIGNIFICANT_DIGITS: usize = 15;

/// Magnitudes rendered as plain decimals; everything else uses exponent form.
const PLAIN_DECIMAL_RANGE: std::ops::Range<f64> = 1e-6..1e21;

/// Coerce a raw cell to its canonical text.
///
/// - empty → `""`
/// - text → unchanged (not trimmed)
/// - boolean → `"true"` / `"false"`
/// - number → [`format_number`]
pub fn coerce_cell(cell: &RawCell) -> String {
    match cell {
        RawCell::Empty => String::new(),
        RawCell::Text(s) => s.clone(),
        RawCell::Boolean(true) => "true".to_string(),
        RawCell::Boolean(false) => "false".to_string(),
        RawCell::Number(n) => format_number(*n),
    }
}

/// Render a number without floating point artifacts.
///
/// Integral values have no fractional part (`3`, not `3.0`), values are rounded
/// to 15 significant digits, and very large/small magnitudes use an exponent
/// with an explicit sign (`1e+21`, `1.5e-7`).
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    // Also folds `-0` into `0`.
    if value == 0.0 {
        return "0".to_string();
    }

    // `{:.N$e}` keeps `N + 1` significant digits; parsing it back picks the closest `f64`,
    // whose shortest round-trip rendering is then free of trailing noise.
    let digits = format!("{value:.prec$e}", prec = SIGNIFICANT_DIGITS - 1);
    let rounded: f64 = digits.parse().unwrap_or(value);
    if rounded.is_infinite() {
        // Rounding up past `f64::MAX`; render the rounded digits as they are.
        return signed_exponent(&trim_mantissa(&digits));
    }
    if PLAIN_DECIMAL_RANGE.contains(&rounded.abs()) {
        return rounded.to_string();
    }
    signed_exponent(&format!("{rounded:e}"))
}

/// `1.5e7` -> `1.5e+7`; negative exponents are left alone.
fn signed_exponent(s: &str) -> String {
    match s.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => s.to_string(),
    }
}

/// Drop trailing zeros from the mantissa of a `{:e}` rendering.
fn trim_mantissa(s: &str) -> String {
    match s.split_once('e') {
        Some((mantissa, exponent)) if mantissa.contains('.') => {
            let mantissa = mantissa.trim_end_matches('0').trim_end_matches('.');
            format!("{mantissa}e{exponent}")
        }
        _ => s.to_string(),
    }
}
