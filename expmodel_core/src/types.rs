//! Shared domain types for the exponential model calculators.
//!
//! - Models and the variables that appear in them
//! - How each variable is displayed
//! - The solution returned by a query

use crate::config::DisplayConfig;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Models and Variables
// ============================================================================

/// The closed-form exponential model a query belongs to
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Model {
    /// Radioactive decay, N(t) = N0·e^(-kt)
    Decay,
    /// Newton's law of cooling, T(t) = Ta + (T0 - Ta)·e^(-kt)
    Cooling,
}

impl Model {
    pub fn name(self) -> &'static str {
        match self {
            Model::Decay => "Radioactive decay",
            Model::Cooling => "Newton's law of cooling",
        }
    }

    pub fn equation(self) -> &'static str {
        match self {
            Model::Decay => "N(t) = N0 * e^(-kt)",
            Model::Cooling => "T(t) = Ta + (T0 - Ta) * e^(-kt)",
        }
    }
}

/// Physical character of a scalar, used to pick display precision
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueKind {
    Quantity,
    Temperature,
    Time,
    Rate,
}

/// Every scalar that can be supplied to, or solved for by, a calculator
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Variable {
    InitialQuantity,
    FinalQuantity,
    DecayConstant,
    ElapsedTime,
    HalfLife,
    AmbientTemperature,
    InitialTemperature,
    FinalTemperature,
    CoolingConstant,
}

impl Variable {
    /// Symbol used in formulas and error messages
    pub fn symbol(self) -> &'static str {
        match self {
            Variable::InitialQuantity => "N0",
            Variable::FinalQuantity => "N(t)",
            Variable::DecayConstant | Variable::CoolingConstant => "k",
            Variable::ElapsedTime => "t",
            Variable::HalfLife => "T_half",
            Variable::AmbientTemperature => "Ta",
            Variable::InitialTemperature => "T0",
            Variable::FinalTemperature => "T(t)",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Variable::InitialQuantity => "initial quantity",
            Variable::FinalQuantity => "final quantity",
            Variable::DecayConstant => "decay constant",
            Variable::ElapsedTime => "elapsed time",
            Variable::HalfLife => "half-life",
            Variable::AmbientTemperature => "ambient temperature",
            Variable::InitialTemperature => "initial temperature",
            Variable::FinalTemperature => "final temperature",
            Variable::CoolingConstant => "cooling constant",
        }
    }

    pub fn kind(self) -> ValueKind {
        match self {
            Variable::InitialQuantity | Variable::FinalQuantity => ValueKind::Quantity,
            Variable::AmbientTemperature
            | Variable::InitialTemperature
            | Variable::FinalTemperature => ValueKind::Temperature,
            Variable::ElapsedTime | Variable::HalfLife => ValueKind::Time,
            Variable::DecayConstant | Variable::CoolingConstant => ValueKind::Rate,
        }
    }

    /// Number of decimals this variable is printed with
    pub fn decimals(self, display: &DisplayConfig) -> usize {
        match self.kind() {
            ValueKind::Rate => display.rate_decimals,
            _ => display.value_decimals,
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label(), self.symbol())
    }
}

// ============================================================================
// Known Inputs
// ============================================================================

/// The scalars supplied to an operation, keyed by variable
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Knowns {
    values: Vec<(Variable, f64)>,
}

impl Knowns {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Knowns::insert`]
    pub fn with(mut self, variable: Variable, value: f64) -> Self {
        self.insert(variable, value);
        self
    }

    /// Set a value, replacing any earlier value for the same variable
    pub fn insert(&mut self, variable: Variable, value: f64) {
        match self.values.iter_mut().find(|(v, _)| *v == variable) {
            Some(slot) => slot.1 = value,
            None => self.values.push((variable, value)),
        }
    }

    pub fn get(&self, variable: Variable) -> Result<f64> {
        self.values
            .iter()
            .find(|(v, _)| *v == variable)
            .map(|(_, value)| *value)
            .ok_or(Error::MissingInput(variable))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Variable, f64)> + '_ {
        self.values.iter().copied()
    }
}

impl FromIterator<(Variable, f64)> for Knowns {
    fn from_iter<I: IntoIterator<Item = (Variable, f64)>>(iter: I) -> Self {
        let mut knowns = Knowns::new();
        for (variable, value) in iter {
            knowns.insert(variable, value);
        }
        knowns
    }
}

// ============================================================================
// Solutions
// ============================================================================

/// The unknown a query solved for, with its value
#[derive(Clone, Copy, Debug, Serialize, PartialEq)]
pub struct Solution {
    pub model: Model,
    pub unknown: Variable,
    pub value: f64,
}

impl Solution {
    /// Render as `<label> (<symbol>) = <value>` at the configured precision
    pub fn format(&self, display: &DisplayConfig) -> String {
        format!(
            "{} = {:.*}",
            self.unknown,
            self.unknown.decimals(display),
            self.value
        )
    }
}
