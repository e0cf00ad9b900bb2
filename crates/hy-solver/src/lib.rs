//! Vectorized fixed-point iteration for batches of independent problems.
//!
//! Every implicit hydraulic relation in hydroflow is written as a map
//! `x = f(x_prev)` evaluated elementwise over a batch. This crate owns the
//! shared loop: seed, apply the map to the whole batch, compare against the
//! previous iterate, stop once every element is within tolerance or the
//! iteration cap is hit.

pub mod elementwise;
pub mod error;
pub mod fixed_point;

pub use elementwise::map_elements;
pub use error::{SolverError, SolverResult};
pub use fixed_point::{
    FixedPointConfig, FixedPointSolution, Seeds, iterate, iterate_elementwise, unconverged,
};
