//! hy-components: batch hydraulic solvers.
//!
//! Provides:
//! - Colebrook-White pressurized pipe flow (discharge, slope, diameter)
//! - Manning open-channel flow and critical depth in trapezoidal sections
//! - Broad-crested weirs (free-flow discharge, modular limit depth)
//! - Sharp-crested weirs (Rouse contraction)
//!
//! Every solver is a pure function of its input slices. [`ProblemBatch`]
//! stores named arrays and dispatches an [`Operation`] against them,
//! writing the results back in place.
//!
//! # Example
//!
//! ```
//! use hy_components::{Operation, ProblemBatch, Quantity};
//!
//! let mut batch = ProblemBatch::new(2)
//!     .with(Quantity::BaseWidth, vec![2.0, 1.0])?
//!     .with(Quantity::SideSlope, vec![1.0, 0.0])?
//!     .with(Quantity::Discharge, vec![3.0, 0.0])?;
//!
//! let report = batch.solve(Operation::CriticalDepth)?;
//! let yc = batch.get(Quantity::CriticalDepth).unwrap();
//! assert!(report.iterations > 0);
//! assert_eq!(yc[1], 0.0);
//! # Ok::<(), hy_components::ComponentError>(())
//! ```

pub mod batch;
pub mod channel;
pub mod common;
pub mod error;
pub mod operation;
pub mod pipe;
pub mod quantity;
pub mod records;
pub mod settings;
pub mod weir;

// Re-exports
pub use batch::ProblemBatch;
pub use channel::{OpenChannel, TrapezoidalSection};
pub use error::{ComponentError, ComponentResult};
pub use operation::{Operation, SolveReport, UnknownOperation};
pub use pipe::{ColebrookWhite, PipeWall};
pub use quantity::{Quantity, UnknownQuantity};
pub use records::{CircularChannel, DripIrrigationUnit, PumpCurve};
pub use settings::{FaultPolicy, HydraulicSettings, PerimeterConvention};
pub use weir::{
    BroadCrestedInputs, BroadCrestedSolution, BroadCrestedWeir, LimitDepthSolution,
    SharpCrestedWeir,
};
