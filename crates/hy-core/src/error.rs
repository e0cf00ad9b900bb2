use thiserror::Error;

pub type HyResult<T> = Result<T, HyError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum HyError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Length mismatch for {what}: expected {expected}, got {actual}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Invariant violated: {what}")]
    Invariant { what: &'static str },
}
