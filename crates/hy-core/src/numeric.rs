use crate::HyError;

/// Floating point type used throughout system
pub type Real = f64;

/// Absolute + relative tolerance pair for comparisons.
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, HyError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(HyError::NonFinite { what, value: v })
    }
}

/// Require a finite, strictly positive scalar.
pub fn ensure_positive(v: Real, what: &'static str) -> Result<Real, HyError> {
    ensure_finite(v, what)?;
    if v > 0.0 {
        Ok(v)
    } else {
        Err(HyError::InvalidArg { what })
    }
}

/// Largest absolute elementwise difference. NaN differences are skipped.
pub fn max_abs_diff(a: &[Real], b: &[Real]) -> Real {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).abs())
        .filter(|d| !d.is_nan())
        .fold(0.0, Real::max)
}
