//! Error types for hydraulic component calculations.

use crate::quantity::Quantity;
use hy_core::error::HyError;
use hy_solver::SolverError;
use thiserror::Error;

/// Errors that can occur during component calculations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComponentError {
    #[error("Missing quantity: {quantity}")]
    MissingQuantity { quantity: Quantity },

    #[error("Length mismatch for {quantity}: expected {expected}, got {actual}")]
    LengthMismatch {
        quantity: Quantity,
        expected: usize,
        actual: usize,
    },

    #[error("Non-physical value: {what}")]
    NonPhysical { what: &'static str },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Solver error: {0}")]
    Solver(#[from] SolverError),
}

pub type ComponentResult<T> = Result<T, ComponentError>;

impl From<ComponentError> for HyError {
    fn from(e: ComponentError) -> Self {
        match e {
            ComponentError::MissingQuantity { .. } => HyError::InvalidArg {
                what: "missing quantity",
            },
            ComponentError::LengthMismatch {
                expected, actual, ..
            } => HyError::LengthMismatch {
                what: "batch array",
                expected,
                actual,
            },
            ComponentError::NonPhysical { what } => HyError::InvalidArg { what },
            ComponentError::InvalidArg { what } => HyError::InvalidArg { what },
            ComponentError::Solver(e) => e.into(),
        }
    }
}
