//! Common utilities for batch component calculations.

use crate::error::{ComponentError, ComponentResult};
use crate::quantity::Quantity;
use hy_core::Real;
use hy_core::numeric::{ensure_finite, ensure_positive};

/// Ensure a value is finite, returning ComponentError if not.
pub fn check_finite(value: Real, what: &'static str) -> ComponentResult<()> {
    ensure_finite(value, what).map_err(|_| ComponentError::NonPhysical { what })?;
    Ok(())
}

/// Ensure a value is finite and strictly positive.
pub fn check_positive(value: Real, what: &'static str) -> ComponentResult<()> {
    ensure_positive(value, what).map_err(|e| match e {
        hy_core::HyError::NonFinite { .. } => ComponentError::NonPhysical { what },
        _ => ComponentError::InvalidArg { what },
    })?;
    Ok(())
}

/// Check that every input array has the length of the first and return it.
pub fn batch_len(inputs: &[(Quantity, &[Real])]) -> ComponentResult<usize> {
    let Some(&(_, first)) = inputs.first() else {
        return Ok(0);
    };
    let expected = first.len();
    for &(quantity, values) in inputs {
        if values.len() != expected {
            return Err(ComponentError::LengthMismatch {
                quantity,
                expected,
                actual: values.len(),
            });
        }
    }
    Ok(expected)
}

/// Zero guard: either driving quantity is exactly zero.
#[inline]
pub fn degenerate(a: Real, b: Real) -> bool {
    a == 0.0 || b == 0.0
}
