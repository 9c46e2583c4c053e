//! Newton's law of cooling solver.
//!
//! Model: `T(t) = Ta + (T0 - Ta) * e^(-kt)`.
//!
//! The same guard rules as the decay solver apply, with one exception:
//! [`solve_ambient_temperature`] divides by `1 - e^(-kt)`, which collapses
//! towards zero as `k*t -> 0`. That denominator is rejected once it falls
//! below [`AMBIENT_DENOMINATOR_TOLERANCE`] rather than only at exact zero.

use crate::error::DomainError;
use crate::guard::{guard_distinct, guard_log_domain, guard_nonzero, guard_not_near_zero};
use crate::{Knowns, Model, Result, Solution, Variable};
use serde::Serialize;

/// Smallest accepted `|1 - e^(-kt)|` when solving for the ambient temperature
pub const AMBIENT_DENOMINATOR_TOLERANCE: f64 = 1e-9;

const RATIO: &str = "(T(t) - Ta)/(T0 - Ta)";
const AMBIENT_DENOMINATOR: &str = "1 - e^(-kt)";

/// `T(t) = Ta + (T0 - Ta) * e^(-kt)`
pub fn solve_final_temperature(ta: f64, t0: f64, k: f64, t: f64) -> f64 {
    ta + (t0 - ta) * (-k * t).exp()
}

/// `T0 = Ta + (T(t) - Ta) * e^(kt)`
pub fn solve_initial_temperature(ta: f64, tf: f64, k: f64, t: f64) -> f64 {
    ta + (tf - ta) * (k * t).exp()
}

/// `Ta = (T(t) - T0 * e^(-kt)) / (1 - e^(-kt))`
pub fn solve_ambient_temperature(
    tf: f64,
    t0: f64,
    k: f64,
    t: f64,
) -> std::result::Result<f64, DomainError> {
    let factor = (-k * t).exp();
    let denominator = 1.0 - factor;
    guard_not_near_zero(denominator, AMBIENT_DENOMINATOR_TOLERANCE, AMBIENT_DENOMINATOR)?;
    Ok((tf - t0 * factor) / denominator)
}

/// `t = (-1/k) * ln((T(t) - Ta) / (T0 - Ta))`
pub fn solve_elapsed_time(
    ta: f64,
    t0: f64,
    tf: f64,
    k: f64,
) -> std::result::Result<f64, DomainError> {
    guard_nonzero(k, Variable::CoolingConstant.symbol())?;
    let ratio = temperature_ratio(ta, t0, tf)?;
    Ok((-1.0 / k) * ratio.ln())
}

/// `k = (-1/t) * ln((T(t) - Ta) / (T0 - Ta))`
pub fn solve_cooling_constant(
    ta: f64,
    t0: f64,
    tf: f64,
    t: f64,
) -> std::result::Result<f64, DomainError> {
    guard_nonzero(t, Variable::ElapsedTime.symbol())?;
    let ratio = temperature_ratio(ta, t0, tf)?;
    Ok((-1.0 / t) * ratio.ln())
}

/// `(T(t) - Ta) / (T0 - Ta)`, positive only when T(t) lies on the same side
/// of Ta as T0
fn temperature_ratio(ta: f64, t0: f64, tf: f64) -> std::result::Result<f64, DomainError> {
    guard_distinct(
        t0,
        ta,
        Variable::InitialTemperature.symbol(),
        Variable::AmbientTemperature.symbol(),
    )?;
    let ratio = (tf - ta) / (t0 - ta);
    guard_log_domain(ratio, RATIO)?;
    Ok(ratio)
}

// ============================================================================
// Calculation Breakdown
// ============================================================================

/// Intermediate values of a forward cooling evaluation
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CoolingBreakdown {
    /// `T0 - Ta`
    pub initial_difference: f64,
    /// `-k * t`
    pub exponent: f64,
    /// `e^(-kt)`
    pub decay_factor: f64,
    /// `Ta + (T0 - Ta) * e^(-kt)`
    pub final_temperature: f64,
}

pub fn breakdown(ta: f64, t0: f64, k: f64, t: f64) -> CoolingBreakdown {
    let initial_difference = t0 - ta;
    let exponent = -k * t;
    let decay_factor = exponent.exp();
    CoolingBreakdown {
        initial_difference,
        exponent,
        decay_factor,
        final_temperature: ta + initial_difference * decay_factor,
    }
}

// ============================================================================
// Operations
// ============================================================================

/// A "solve for X" operation of the cooling calculator
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CoolingOperation {
    FinalTemperature,
    ElapsedTime,
    CoolingConstant,
    InitialTemperature,
    AmbientTemperature,
}

impl CoolingOperation {
    /// Menu order
    pub const ALL: [CoolingOperation; 5] = [
        CoolingOperation::FinalTemperature,
        CoolingOperation::ElapsedTime,
        CoolingOperation::CoolingConstant,
        CoolingOperation::InitialTemperature,
        CoolingOperation::AmbientTemperature,
    ];

    pub fn unknown(self) -> Variable {
        match self {
            CoolingOperation::FinalTemperature => Variable::FinalTemperature,
            CoolingOperation::ElapsedTime => Variable::ElapsedTime,
            CoolingOperation::CoolingConstant => Variable::CoolingConstant,
            CoolingOperation::InitialTemperature => Variable::InitialTemperature,
            CoolingOperation::AmbientTemperature => Variable::AmbientTemperature,
        }
    }

    /// Inputs in the order they are asked for
    pub fn inputs(self) -> &'static [Variable] {
        use Variable::*;
        match self {
            CoolingOperation::FinalTemperature => &[
                AmbientTemperature,
                InitialTemperature,
                CoolingConstant,
                ElapsedTime,
            ],
            CoolingOperation::ElapsedTime => &[
                AmbientTemperature,
                InitialTemperature,
                FinalTemperature,
                CoolingConstant,
            ],
            CoolingOperation::CoolingConstant => &[
                AmbientTemperature,
                InitialTemperature,
                FinalTemperature,
                ElapsedTime,
            ],
            CoolingOperation::InitialTemperature => &[
                AmbientTemperature,
                FinalTemperature,
                CoolingConstant,
                ElapsedTime,
            ],
            CoolingOperation::AmbientTemperature => &[
                FinalTemperature,
                InitialTemperature,
                CoolingConstant,
                ElapsedTime,
            ],
        }
    }

    pub fn formula(self) -> &'static str {
        match self {
            CoolingOperation::FinalTemperature => "T(t) = Ta + (T0 - Ta) * e^(-kt)",
            CoolingOperation::ElapsedTime => "t = (-1/k) * ln((T(t) - Ta) / (T0 - Ta))",
            CoolingOperation::CoolingConstant => "k = (-1/t) * ln((T(t) - Ta) / (T0 - Ta))",
            CoolingOperation::InitialTemperature => "T0 = Ta + (T(t) - Ta) * e^(kt)",
            CoolingOperation::AmbientTemperature => "Ta = (T(t) - T0 * e^(-kt)) / (1 - e^(-kt))",
        }
    }

    /// Menu description
    pub fn title(self) -> &'static str {
        match self {
            CoolingOperation::FinalTemperature => "Final temperature T(t)",
            CoolingOperation::ElapsedTime => "Elapsed time t",
            CoolingOperation::CoolingConstant => "Cooling constant k",
            CoolingOperation::InitialTemperature => "Initial temperature T0",
            CoolingOperation::AmbientTemperature => "Ambient temperature Ta",
        }
    }

    pub fn solve(self, knowns: &Knowns) -> Result<Solution> {
        use Variable::*;
        let value = match self {
            CoolingOperation::FinalTemperature => solve_final_temperature(
                knowns.get(AmbientTemperature)?,
                knowns.get(InitialTemperature)?,
                knowns.get(CoolingConstant)?,
                knowns.get(ElapsedTime)?,
            ),
            CoolingOperation::ElapsedTime => solve_elapsed_time(
                knowns.get(AmbientTemperature)?,
                knowns.get(InitialTemperature)?,
                knowns.get(FinalTemperature)?,
                knowns.get(CoolingConstant)?,
            )?,
            CoolingOperation::CoolingConstant => solve_cooling_constant(
                knowns.get(AmbientTemperature)?,
                knowns.get(InitialTemperature)?,
                knowns.get(FinalTemperature)?,
                knowns.get(ElapsedTime)?,
            )?,
            CoolingOperation::InitialTemperature => solve_initial_temperature(
                knowns.get(AmbientTemperature)?,
                knowns.get(FinalTemperature)?,
                knowns.get(CoolingConstant)?,
                knowns.get(ElapsedTime)?,
            ),
            CoolingOperation::AmbientTemperature => solve_ambient_temperature(
                knowns.get(FinalTemperature)?,
                knowns.get(InitialTemperature)?,
                knowns.get(CoolingConstant)?,
                knowns.get(ElapsedTime)?,
            )?,
        };

        tracing::debug!("Cooling {:?} solved: {} = {}", self, self.unknown().symbol(), value);

        Ok(Solution {
            model: Model::Cooling,
            unknown: self.unknown(),
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Violation;
    use proptest::prelude::*;

    fn assert_close(actual: f64, expected: f64) {
        let scale = expected.abs().max(1.0);
        assert!(
            (actual - expected).abs() <= 1e-9 * scale,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_final_temperature_scenario() {
        // 25 + 75 * e^(-1)
        let tf = solve_final_temperature(25.0, 100.0, 0.1, 10.0);
        assert_close(tf, 52.590_958_087_858_18);
        assert_eq!(format!("{:.4}", tf), "52.5910");
    }

    #[test]
    fn test_inverse_operations_recover_inputs() {
        let (ta, t0, k, t) = (25.0, 100.0, 0.1, 10.0);
        let tf = solve_final_temperature(ta, t0, k, t);

        assert_close(solve_elapsed_time(ta, t0, tf, k).unwrap(), t);
        assert_close(solve_cooling_constant(ta, t0, tf, t).unwrap(), k);
        assert_close(solve_ambient_temperature(tf, t0, k, t).unwrap(), ta);
    }

    #[test]
    fn test_heating_towards_ambient() {
        // A cold object warming up in a hot room
        let tf = solve_final_temperature(30.0, 5.0, 0.2, 3.0);
        assert!(tf > 5.0 && tf < 30.0);
        assert_close(solve_elapsed_time(30.0, 5.0, tf, 0.2).unwrap(), 3.0);
    }

    #[test]
    fn test_equal_initial_and_ambient_rejected() {
        let err = solve_elapsed_time(25.0, 25.0, 30.0, 0.1).unwrap_err();
        assert_eq!(err.field, "T0");
        assert_eq!(err.violation, Violation::EqualTo("Ta"));

        assert!(solve_cooling_constant(25.0, 25.0, 30.0, 2.0).is_err());
    }

    #[test]
    fn test_final_temperature_past_ambient_rejected() {
        // T(t) on the other side of Ta makes the ratio negative
        let err = solve_cooling_constant(25.0, 100.0, 20.0, 5.0).unwrap_err();
        assert_eq!(err.field, "(T(t) - Ta)/(T0 - Ta)");
        assert_eq!(err.violation, Violation::LogArgumentNotPositive);
    }

    #[test]
    fn test_zero_divisors_rejected() {
        let err = solve_elapsed_time(25.0, 100.0, 50.0, 0.0).unwrap_err();
        assert_eq!((err.field, err.violation), ("k", Violation::Zero));

        let err = solve_cooling_constant(25.0, 100.0, 50.0, 0.0).unwrap_err();
        assert_eq!((err.field, err.violation), ("t", Violation::Zero));
    }

    #[test]
    fn test_ambient_rejects_exact_zero_time() {
        let err = solve_ambient_temperature(50.0, 100.0, 0.1, 0.0).unwrap_err();
        assert_eq!(err.field, "1 - e^(-kt)");
    }

    #[test]
    fn test_ambient_rejects_near_zero_denominator() {
        // k*t = 1e-10: not zero, but below the stability tolerance
        let err = solve_ambient_temperature(99.999_999, 100.0, 1e-6, 1e-4).unwrap_err();
        assert_eq!(
            err.violation,
            Violation::NearZero {
                tolerance: AMBIENT_DENOMINATOR_TOLERANCE
            }
        );
    }

    #[test]
    fn test_ambient_accepts_small_but_stable_denominator() {
        // k*t = 1e-6 stays above the tolerance
        assert!(solve_ambient_temperature(99.99, 100.0, 1e-3, 1e-3).is_ok());
    }

    #[test]
    fn test_breakdown_matches_solver() {
        let steps = breakdown(25.0, 100.0, 0.1, 10.0);
        assert_close(steps.initial_difference, 75.0);
        assert_close(steps.exponent, -1.0);
        assert_close(
            steps.final_temperature,
            solve_final_temperature(25.0, 100.0, 0.1, 10.0),
        );
    }

    #[test]
    fn test_operation_inputs_cover_solve() {
        let values = [
            (Variable::AmbientTemperature, 20.0),
            (Variable::InitialTemperature, 90.0),
            (Variable::FinalTemperature, 60.0),
            (Variable::CoolingConstant, 0.05),
            (Variable::ElapsedTime, 12.0),
        ];

        for op in CoolingOperation::ALL {
            let knowns: Knowns = values
                .iter()
                .copied()
                .filter(|(v, _)| op.inputs().contains(v))
                .collect();
            let solution = op.solve(&knowns).unwrap();
            assert_eq!(solution.model, Model::Cooling);
            assert_eq!(solution.unknown, op.unknown());
            assert!(!op.inputs().contains(&op.unknown()));
        }
    }

    proptest! {
        #[test]
        fn prop_initial_temperature_round_trip(
            ta in -50.0f64..50.0,
            offset in 1.0f64..150.0,
            k in 1e-4f64..1.0,
            t in 0.0f64..5.0,
        ) {
            let t0 = ta + offset;
            let tf = solve_final_temperature(ta, t0, k, t);
            let back = solve_initial_temperature(ta, tf, k, t);
            prop_assert!((back - t0).abs() <= 1e-9 * t0.abs().max(1.0));
        }

        #[test]
        fn prop_ambient_guard_fires_below_tolerance(
            k in 1e-6f64..1.0,
            kt in 0.0f64..9e-10,
        ) {
            let t = kt / k;
            prop_assert!(solve_ambient_temperature(50.0, 100.0, k, t).is_err());
        }
    }
}
