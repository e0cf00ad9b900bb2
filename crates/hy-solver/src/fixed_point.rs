//! Batch fixed-point driver.

use crate::elementwise::map_elements;
use crate::error::{SolverError, SolverResult};
use hy_core::Real;
use hy_core::numeric::max_abs_diff;

/// Fixed-point iteration configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedPointConfig {
    /// Maximum admitted elementwise change between successive iterates
    pub tolerance: Real,
    /// Hard cap on update passes
    pub max_iterations: usize,
    /// Batch length from which updates are mapped in parallel
    pub parallel_threshold: usize,
}

impl Default for FixedPointConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-6,
            max_iterations: 500,
            parallel_threshold: 4096,
        }
    }
}

impl FixedPointConfig {
    pub fn validate(&self) -> SolverResult<()> {
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(SolverError::InvalidConfig {
                what: "tolerance must be finite and positive",
            });
        }
        if self.max_iterations == 0 {
            return Err(SolverError::InvalidConfig {
                what: "max_iterations must be at least 1",
            });
        }
        Ok(())
    }
}

/// Scalar seeds broadcast over the batch.
///
/// `current` is the first value handed to the update; `previous` only has to
/// sit far enough from it that the first convergence check fails.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Seeds {
    pub current: Real,
    pub previous: Real,
}

impl Seeds {
    pub const fn new(current: Real, previous: Real) -> Self {
        Self { current, previous }
    }
}

/// Converged iterate.
#[derive(Clone, Debug, PartialEq)]
pub struct FixedPointSolution {
    /// Final iterate, aligned with the batch
    pub values: Vec<Real>,
    /// Number of update passes applied
    pub iterations: usize,
}

/// Indices whose successive iterates still differ by more than `tolerance`.
///
/// A NaN difference never counts as unconverged: a faulted instance carries
/// NaN to the output instead of holding the rest of the batch hostage.
pub fn unconverged(current: &[Real], previous: &[Real], tolerance: Real) -> Vec<usize> {
    current
        .iter()
        .zip(previous)
        .enumerate()
        .filter(|(_, (c, p))| (*c - *p).abs() > tolerance)
        .map(|(i, _)| i)
        .collect()
}

fn any_unconverged(current: &[Real], previous: &[Real], tolerance: Real) -> bool {
    current
        .iter()
        .zip(previous)
        .any(|(c, p)| (c - p).abs() > tolerance)
}

/// Iterate a whole-batch update until every element settles.
///
/// Each pass replaces `previous` with `current` and `current` with
/// `update(previous)`. All elements are updated on every pass, converged or
/// not. Use this form when one pass needs batch-level work (e.g. an inner
/// solve); otherwise prefer [`iterate_elementwise`]. The update may fail with
/// any error that a [`SolverError`] converts into.
pub fn iterate<F, E>(
    initial: Vec<Real>,
    previous: Vec<Real>,
    config: &FixedPointConfig,
    mut update: F,
) -> Result<FixedPointSolution, E>
where
    F: FnMut(&[Real]) -> Result<Vec<Real>, E>,
    E: From<SolverError>,
{
    config.validate()?;
    if previous.len() != initial.len() {
        return Err(SolverError::LengthMismatch {
            what: "previous-guess seed",
            expected: initial.len(),
            actual: previous.len(),
        }
        .into());
    }

    let len = initial.len();
    let mut current = initial;
    let mut previous = previous;
    let mut iterations = 0;

    while any_unconverged(&current, &previous, config.tolerance) {
        if iterations >= config.max_iterations {
            let stragglers = unconverged(&current, &previous, config.tolerance);
            let max_delta = max_abs_diff(&current, &previous);
            tracing::warn!(
                iterations,
                unconverged = stragglers.len(),
                max_delta,
                "fixed-point iteration hit its cap"
            );
            return Err(SolverError::NonConvergence {
                iterations,
                unconverged: stragglers,
                max_delta,
            }
            .into());
        }

        let next = update(&current)?;
        if next.len() != len {
            return Err(SolverError::LengthMismatch {
                what: "update output",
                expected: len,
                actual: next.len(),
            }
            .into());
        }
        previous = std::mem::replace(&mut current, next);
        iterations += 1;

        tracing::trace!(
            iteration = iterations,
            max_delta = max_abs_diff(&current, &previous),
            "fixed-point pass"
        );
    }

    tracing::debug!(iterations, len, "fixed-point iteration converged");
    Ok(FixedPointSolution {
        values: current,
        iterations,
    })
}

/// Iterate an elementwise map `x_i = f(i, x_prev_i)` over a batch of `len`.
pub fn iterate_elementwise<F>(
    len: usize,
    seeds: Seeds,
    config: &FixedPointConfig,
    update: F,
) -> SolverResult<FixedPointSolution>
where
    F: Fn(usize, Real) -> Real + Sync + Send,
{
    let threshold = config.parallel_threshold;
    iterate(
        vec![seeds.current; len],
        vec![seeds.previous; len],
        config,
        |prev| Ok(map_elements(len, threshold, |i| update(i, prev[i]))),
    )
}
