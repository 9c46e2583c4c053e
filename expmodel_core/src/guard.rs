//! Domain guards run before every division or logarithm in the solvers.
//!
//! All guards compare exactly except [`guard_not_near_zero`], which exists
//! for the one denominator that becomes ill-conditioned as it approaches zero.

use crate::error::{DomainError, Violation};

/// Fails if `value` is exactly zero
pub fn guard_nonzero(value: f64, field: &'static str) -> Result<(), DomainError> {
    if value == 0.0 {
        return Err(reject(field, value, Violation::Zero));
    }
    Ok(())
}

/// Fails if `value <= 0`
pub fn guard_positive(value: f64, field: &'static str) -> Result<(), DomainError> {
    if value <= 0.0 || value.is_nan() {
        return Err(reject(field, value, Violation::NotPositive));
    }
    Ok(())
}

/// Fails if `ratio <= 0`, where the natural logarithm is undefined
pub fn guard_log_domain(ratio: f64, field: &'static str) -> Result<(), DomainError> {
    if ratio <= 0.0 || ratio.is_nan() {
        return Err(reject(field, ratio, Violation::LogArgumentNotPositive));
    }
    Ok(())
}

/// Fails if `value` equals `other` exactly
pub fn guard_distinct(
    value: f64,
    other: f64,
    field: &'static str,
    other_field: &'static str,
) -> Result<(), DomainError> {
    if value == other {
        return Err(reject(field, value, Violation::EqualTo(other_field)));
    }
    Ok(())
}

/// Fails if `|value| < tolerance`
pub fn guard_not_near_zero(
    value: f64,
    tolerance: f64,
    field: &'static str,
) -> Result<(), DomainError> {
    if value.abs() < tolerance || value.is_nan() {
        return Err(reject(field, value, Violation::NearZero { tolerance }));
    }
    Ok(())
}

fn reject(field: &'static str, value: f64, violation: Violation) -> DomainError {
    tracing::debug!("Guard rejected {} = {}: {}", field, value, violation);
    DomainError::new(field, value, violation)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nonzero_is_exact() {
        assert!(guard_nonzero(0.0, "k").is_err());
        assert!(guard_nonzero(-0.0, "k").is_err());
        assert!(guard_nonzero(1e-300, "k").is_ok());
        assert!(guard_nonzero(-2.0, "k").is_ok());
    }

    #[test]
    fn test_positive_rejects_zero_and_negative() {
        assert!(guard_positive(0.0, "T_half").is_err());
        assert!(guard_positive(-1.0, "T_half").is_err());
        assert!(guard_positive(f64::NAN, "T_half").is_err());
        assert!(guard_positive(0.5, "T_half").is_ok());
    }

    #[test]
    fn test_log_domain() {
        let err = guard_log_domain(0.0, "N(t)/N0").unwrap_err();
        assert_eq!(err.field, "N(t)/N0");
        assert_eq!(err.violation, Violation::LogArgumentNotPositive);
        assert!(guard_log_domain(-0.5, "N(t)/N0").is_err());
        assert!(guard_log_domain(0.5, "N(t)/N0").is_ok());
    }

    #[test]
    fn test_distinct() {
        let err = guard_distinct(25.0, 25.0, "T0", "Ta").unwrap_err();
        assert_eq!(err.violation, Violation::EqualTo("Ta"));
        assert!(guard_distinct(25.000_001, 25.0, "T0", "Ta").is_ok());
    }

    #[test]
    fn test_near_zero_uses_tolerance() {
        assert!(guard_not_near_zero(5e-10, 1e-9, "d").is_err());
        assert!(guard_not_near_zero(-5e-10, 1e-9, "d").is_err());
        assert!(guard_not_near_zero(1e-9, 1e-9, "d").is_ok());
        assert!(guard_not_near_zero(0.3, 1e-9, "d").is_ok());
    }
}
