//! Parsing of user-typed numbers.

use crate::error::InputFormatError;

/// Parse `text` as a finite number for `field`.
///
/// Surrounding whitespace is ignored. `inf` and `NaN` are rejected so that
/// only real measurements reach the solvers.
pub fn parse_value(text: &str, field: &str) -> Result<f64, InputFormatError> {
    let trimmed = text.trim();
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(InputFormatError {
            field: field.to_string(),
            input: trimmed.to_string(),
        }),
    }
}
