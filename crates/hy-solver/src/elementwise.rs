//! Elementwise evaluation over the batch dimension.

use hy_core::Real;
use rayon::prelude::*;

/// Evaluate `f(i)` for every index of a batch of length `len`.
///
/// Batches of at least `parallel_threshold` elements are split across the
/// rayon pool; smaller ones run on the calling thread. Output order always
/// matches index order, so the result is identical either way.
pub fn map_elements<F>(len: usize, parallel_threshold: usize, f: F) -> Vec<Real>
where
    F: Fn(usize) -> Real + Sync + Send,
{
    if len >= parallel_threshold {
        (0..len).into_par_iter().map(f).collect()
    } else {
        (0..len).map(f).collect()
    }
}
