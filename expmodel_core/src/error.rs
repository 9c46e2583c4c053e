//! Error types for the expmodel_core library.

use crate::types::Variable;
use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for expmodel_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A solver precondition was violated
    #[error("{0}")]
    Domain(#[from] DomainError),

    /// User-supplied text was not a number
    #[error("{0}")]
    InputFormat(#[from] InputFormatError),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// An operation was solved without one of the inputs it needs
    #[error("missing value for {0}")]
    MissingInput(Variable),
}

/// The condition a guarded value failed to satisfy.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum Violation {
    #[error("must not be zero")]
    Zero,

    #[error("must be positive")]
    NotPositive,

    /// The argument of a natural logarithm was zero or negative
    #[error("must be positive for the logarithm to be defined")]
    LogArgumentNotPositive,

    /// Two values that must differ were exactly equal
    #[error("must differ from {0}")]
    EqualTo(&'static str),

    /// A denominator collapsed below the numerical stability tolerance
    #[error("must not be within {tolerance:e} of zero")]
    NearZero { tolerance: f64 },
}

/// A formula precondition was violated before evaluation.
///
/// `field` names the offending input (`k`, `N0`, `T0`) or the derived
/// expression (`N(t)/N0`, `1 - e^(-kt)`) that failed its guard.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("{field} {violation} (got {value})")]
pub struct DomainError {
    pub field: &'static str,
    pub value: f64,
    pub violation: Violation,
}

impl DomainError {
    pub fn new(field: &'static str, value: f64, violation: Violation) -> Self {
        Self {
            field,
            value,
            violation,
        }
    }
}

/// Text that could not be read as a finite number.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("'{input}' is not a valid number for {field}")]
pub struct InputFormatError {
    pub field: String,
    pub input: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_error_message_names_field_and_condition() {
        let err = DomainError::new("k", 0.0, Violation::Zero);
        assert_eq!(err.to_string(), "k must not be zero (got 0)");

        let err = DomainError::new("T0", 25.0, Violation::EqualTo("Ta"));
        assert_eq!(err.to_string(), "T0 must differ from Ta (got 25)");
    }

    #[test]
    fn test_near_zero_message_includes_tolerance() {
        let err = DomainError::new("1 - e^(-kt)", 0.0, Violation::NearZero { tolerance: 1e-9 });
        assert!(err.to_string().contains("1e-9"));
    }

    #[test]
    fn test_domain_error_lifts_into_error() {
        fn fails() -> Result<f64> {
            let solved: std::result::Result<f64, DomainError> =
                Err(DomainError::new("t", 0.0, Violation::Zero));
            Ok(solved?)
        }

        assert!(matches!(fails(), Err(Error::Domain(_))));
    }
}
