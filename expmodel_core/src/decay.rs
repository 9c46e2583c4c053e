//! Radioactive decay solver.
//!
//! Model: `N(t) = N0 * e^(-kt)`, with the half-life relation
//! `T_half = ln(2) / k`.
//!
//! Each `solve_*` function isolates one variable given the others. Functions
//! whose formula has no division or logarithm cannot fail and return `f64`
//! directly; the rest run their guards in order and return [`DomainError`]
//! on the first one that fails.

use crate::error::DomainError;
use crate::guard::{guard_log_domain, guard_nonzero, guard_positive};
use crate::{Knowns, Model, Result, Solution, Variable};
use serde::Serialize;
use std::f64::consts::LN_2;

const RATIO: &str = "N(t)/N0";

/// `N(t) = N0 * e^(-kt)`
pub fn solve_final_quantity(n0: f64, k: f64, t: f64) -> f64 {
    n0 * (-k * t).exp()
}

/// `N0 = N(t) * e^(kt)`
pub fn solve_initial_quantity(nf: f64, k: f64, t: f64) -> f64 {
    nf * (k * t).exp()
}

/// `t = (-1/k) * ln(N(t) / N0)`
pub fn solve_elapsed_time(n0: f64, nf: f64, k: f64) -> std::result::Result<f64, DomainError> {
    guard_nonzero(k, Variable::DecayConstant.symbol())?;
    let ratio = quantity_ratio(n0, nf)?;
    Ok((-1.0 / k) * ratio.ln())
}

/// `k = (-1/t) * ln(N(t) / N0)`
pub fn solve_decay_constant(n0: f64, nf: f64, t: f64) -> std::result::Result<f64, DomainError> {
    guard_nonzero(t, Variable::ElapsedTime.symbol())?;
    let ratio = quantity_ratio(n0, nf)?;
    Ok((-1.0 / t) * ratio.ln())
}

/// `T_half = ln(2) / k`
pub fn solve_half_life(k: f64) -> std::result::Result<f64, DomainError> {
    guard_positive(k, Variable::DecayConstant.symbol())?;
    Ok(LN_2 / k)
}

/// `k = ln(2) / T_half`
pub fn solve_decay_constant_from_half_life(
    half_life: f64,
) -> std::result::Result<f64, DomainError> {
    guard_positive(half_life, Variable::HalfLife.symbol())?;
    Ok(LN_2 / half_life)
}

fn quantity_ratio(n0: f64, nf: f64) -> std::result::Result<f64, DomainError> {
    guard_nonzero(n0, Variable::InitialQuantity.symbol())?;
    let ratio = nf / n0;
    guard_log_domain(ratio, RATIO)?;
    Ok(ratio)
}

// ============================================================================
// Calculation Breakdown
// ============================================================================

/// Intermediate values of a forward decay evaluation
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct DecayBreakdown {
    /// `-k * t`
    pub exponent: f64,
    /// `e^(-kt)`
    pub decay_factor: f64,
    /// `N0 * e^(-kt)`
    pub final_quantity: f64,
}

pub fn breakdown(n0: f64, k: f64, t: f64) -> DecayBreakdown {
    let exponent = -k * t;
    let decay_factor = exponent.exp();
    DecayBreakdown {
        exponent,
        decay_factor,
        final_quantity: n0 * decay_factor,
    }
}

// ============================================================================
// Operations
// ============================================================================

/// A "solve for X" operation of the decay calculator
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DecayOperation {
    FinalQuantity,
    InitialQuantity,
    ElapsedTime,
    DecayConstant,
    HalfLife,
    DecayConstantFromHalfLife,
}

impl DecayOperation {
    /// Menu order
    pub const ALL: [DecayOperation; 6] = [
        DecayOperation::FinalQuantity,
        DecayOperation::InitialQuantity,
        DecayOperation::ElapsedTime,
        DecayOperation::DecayConstant,
        DecayOperation::HalfLife,
        DecayOperation::DecayConstantFromHalfLife,
    ];

    pub fn unknown(self) -> Variable {
        match self {
            DecayOperation::FinalQuantity => Variable::FinalQuantity,
            DecayOperation::InitialQuantity => Variable::InitialQuantity,
            DecayOperation::ElapsedTime => Variable::ElapsedTime,
            DecayOperation::DecayConstant | DecayOperation::DecayConstantFromHalfLife => {
                Variable::DecayConstant
            }
            DecayOperation::HalfLife => Variable::HalfLife,
        }
    }

    /// Inputs in the order they are asked for
    pub fn inputs(self) -> &'static [Variable] {
        use Variable::*;
        match self {
            DecayOperation::FinalQuantity => &[InitialQuantity, DecayConstant, ElapsedTime],
            DecayOperation::InitialQuantity => &[FinalQuantity, DecayConstant, ElapsedTime],
            DecayOperation::ElapsedTime => &[InitialQuantity, FinalQuantity, DecayConstant],
            DecayOperation::DecayConstant => &[InitialQuantity, FinalQuantity, ElapsedTime],
            DecayOperation::HalfLife => &[DecayConstant],
            DecayOperation::DecayConstantFromHalfLife => &[HalfLife],
        }
    }

    pub fn formula(self) -> &'static str {
        match self {
            DecayOperation::FinalQuantity => "N(t) = N0 * e^(-kt)",
            DecayOperation::InitialQuantity => "N0 = N(t) * e^(kt)",
            DecayOperation::ElapsedTime => "t = (-1/k) * ln(N(t) / N0)",
            DecayOperation::DecayConstant => "k = (-1/t) * ln(N(t) / N0)",
            DecayOperation::HalfLife => "T_half = ln(2) / k",
            DecayOperation::DecayConstantFromHalfLife => "k = ln(2) / T_half",
        }
    }

    /// Menu description
    pub fn title(self) -> &'static str {
        match self {
            DecayOperation::FinalQuantity => "Final quantity N(t)",
            DecayOperation::InitialQuantity => "Initial quantity N0",
            DecayOperation::ElapsedTime => "Elapsed time t",
            DecayOperation::DecayConstant => "Decay constant k (from N0, N(t) and t)",
            DecayOperation::HalfLife => "Half-life T_half (from k)",
            DecayOperation::DecayConstantFromHalfLife => "Decay constant k (from the half-life)",
        }
    }

    pub fn solve(self, knowns: &Knowns) -> Result<Solution> {
        use Variable::*;
        let value = match self {
            DecayOperation::FinalQuantity => solve_final_quantity(
                knowns.get(InitialQuantity)?,
                knowns.get(DecayConstant)?,
                knowns.get(ElapsedTime)?,
            ),
            DecayOperation::InitialQuantity => solve_initial_quantity(
                knowns.get(FinalQuantity)?,
                knowns.get(DecayConstant)?,
                knowns.get(ElapsedTime)?,
            ),
            DecayOperation::ElapsedTime => solve_elapsed_time(
                knowns.get(InitialQuantity)?,
                knowns.get(FinalQuantity)?,
                knowns.get(DecayConstant)?,
            )?,
            DecayOperation::DecayConstant => solve_decay_constant(
                knowns.get(InitialQuantity)?,
                knowns.get(FinalQuantity)?,
                knowns.get(ElapsedTime)?,
            )?,
            DecayOperation::HalfLife => solve_half_life(knowns.get(DecayConstant)?)?,
            DecayOperation::DecayConstantFromHalfLife => {
                solve_decay_constant_from_half_life(knowns.get(HalfLife)?)?
            }
        };

        tracing::debug!("Decay {:?} solved: {} = {}", self, self.unknown().symbol(), value);

        Ok(Solution {
            model: Model::Decay,
            unknown: self.unknown(),
            value,
        })
    }
}
