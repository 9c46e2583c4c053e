#![forbid(unsafe_code)]

//! Equation-solving core for two closed-form exponential models.
//!
//! This crate provides:
//! - Radioactive decay, `N(t) = N0 * e^(-kt)`, solvable for any variable
//! - Newton's law of cooling, `T(t) = Ta + (T0 - Ta) * e^(-kt)`, likewise
//! - Domain guards that reject inputs for which a formula is undefined
//! - Curve sampling and CSV export for plotting
//! - Configuration, logging, and number parsing for presentation layers

pub mod types;
pub mod error;
pub mod guard;
pub mod decay;
pub mod cooling;
pub mod operation;
pub mod curve;
pub mod export;
pub mod input;
pub mod config;
pub mod logging;

// Re-export commonly used types
pub use error::{DomainError, Error, InputFormatError, Result, Violation};
pub use types::*;
pub use config::Config;
pub use decay::DecayOperation;
pub use cooling::CoolingOperation;
pub use operation::Operation;
pub use curve::{Curve, CurveModel, CurvePoint};
pub use input::parse_value;
