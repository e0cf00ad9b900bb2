//! Error types for fixed-point iteration.

use hy_core::error::HyError;
use thiserror::Error;

/// Errors that can occur while driving a fixed-point iteration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error(
        "No convergence after {iterations} iterations: {} instance(s) outside tolerance (max delta {max_delta:e})",
        .unconverged.len()
    )]
    NonConvergence {
        iterations: usize,
        /// Batch indices still outside tolerance when the cap was hit.
        unconverged: Vec<usize>,
        max_delta: f64,
    },

    #[error("Length mismatch for {what}: expected {expected}, got {actual}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid configuration: {what}")]
    InvalidConfig { what: &'static str },
}

pub type SolverResult<T> = Result<T, SolverError>;

impl From<SolverError> for HyError {
    fn from(e: SolverError) -> Self {
        match e {
            SolverError::NonConvergence { .. } => HyError::InvalidArg {
                what: "convergence",
            },
            SolverError::LengthMismatch {
                what,
                expected,
                actual,
            } => HyError::LengthMismatch {
                what,
                expected,
                actual,
            },
            SolverError::InvalidConfig { what } => HyError::InvalidArg { what },
        }
    }
}
