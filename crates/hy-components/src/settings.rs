//! Per-batch physical constants and iteration controls.

use crate::common::check_positive;
use crate::error::ComponentResult;
use hy_core::Real;
use hy_core::units::{Accel, constants::G0_MPS2};
use hy_solver::FixedPointConfig;

/// Wetted-perimeter form used by the Manning relations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PerimeterConvention {
    /// `b + 2·y·√(1+z²)` for both discharge and slope.
    #[default]
    Standard,
    /// Discharge uses `b + y·√(1+z²)`, slope uses `b + 2·y·√(1+z²)`.
    Reference,
}

/// What a Manning slope evaluation does with an instance whose arithmetic
/// fails (non-finite result outside the zero-guard set).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FaultPolicy {
    /// Zero only the faulted instances.
    #[default]
    PerElement,
    /// Zero the whole output array if any instance faults.
    WholeBatch,
}

/// Scalars broadcast to every instance of a batch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HydraulicSettings {
    /// Gravitational acceleration, m/s²
    pub gravity: Real,
    /// Maximum admitted change between successive iterates
    pub tolerance: Real,
    /// Iteration cap for every fixed-point solve
    pub max_iterations: usize,
    /// Batch length from which updates run on the rayon pool
    pub parallel_threshold: usize,
    /// Include the approach velocity head in the sharp-crested weir equation
    pub approach_velocity_head: bool,
    pub perimeter: PerimeterConvention,
    pub fault_policy: FaultPolicy,
}

impl Default for HydraulicSettings {
    fn default() -> Self {
        let fp = FixedPointConfig::default();
        Self {
            gravity: G0_MPS2,
            tolerance: fp.tolerance,
            max_iterations: fp.max_iterations,
            parallel_threshold: fp.parallel_threshold,
            approach_velocity_head: false,
            perimeter: PerimeterConvention::default(),
            fault_policy: FaultPolicy::default(),
        }
    }
}

impl HydraulicSettings {
    /// Override gravity from a typed acceleration.
    pub fn with_gravity(mut self, g: Accel) -> Self {
        self.gravity = g.value;
        self
    }

    pub fn with_tolerance(mut self, tolerance: Real) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn validate(&self) -> ComponentResult<()> {
        check_positive(self.gravity, "gravity must be finite and positive")?;
        self.fixed_point().validate()?;
        Ok(())
    }

    pub fn fixed_point(&self) -> FixedPointConfig {
        FixedPointConfig {
            tolerance: self.tolerance,
            max_iterations: self.max_iterations,
            parallel_threshold: self.parallel_threshold,
        }
    }
}
