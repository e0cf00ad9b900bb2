//! Solver entry points addressable by name, and in-place batch solving.

use crate::batch::ProblemBatch;
use crate::channel::{OpenChannel, TrapezoidalSection};
use crate::error::ComponentResult;
use crate::pipe::{ColebrookWhite, PipeWall};
use crate::quantity::Quantity;
use crate::weir::{BroadCrestedInputs, BroadCrestedWeir, SharpCrestedWeir};
use core::fmt;
use core::str::FromStr;
use hy_core::Real;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    PipeDischarge,
    PipeSlope,
    PipeDiameter,
    ManningDischarge,
    ManningSlope,
    CriticalDepth,
    BroadCrestedLimitDepth,
    BroadCrestedDischarge,
    SharpCrestedDischarge,
}

impl Operation {
    pub const ALL: [Operation; 9] = [
        Operation::PipeDischarge,
        Operation::PipeSlope,
        Operation::PipeDiameter,
        Operation::ManningDischarge,
        Operation::ManningSlope,
        Operation::CriticalDepth,
        Operation::BroadCrestedLimitDepth,
        Operation::BroadCrestedDischarge,
        Operation::SharpCrestedDischarge,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Operation::PipeDischarge => "pipe_discharge",
            Operation::PipeSlope => "pipe_slope",
            Operation::PipeDiameter => "pipe_diameter",
            Operation::ManningDischarge => "manning_discharge",
            Operation::ManningSlope => "manning_slope",
            Operation::CriticalDepth => "critical_depth",
            Operation::BroadCrestedLimitDepth => "broad_crested_limit_depth",
            Operation::BroadCrestedDischarge => "broad_crested_discharge",
            Operation::SharpCrestedDischarge => "sharp_crested_discharge",
        }
    }

    /// Inputs that must be present before solving.
    pub fn required(self) -> &'static [Quantity] {
        use Quantity::*;
        match self {
            Operation::PipeDischarge => &[Slope, Diameter, Roughness, Viscosity],
            Operation::PipeSlope => &[Discharge, Diameter, Roughness, Viscosity],
            Operation::PipeDiameter => &[Discharge, Slope, Roughness, Viscosity],
            Operation::ManningDischarge => &[BaseWidth, SideSlope, ManningN, Depth, Slope],
            Operation::ManningSlope => &[BaseWidth, SideSlope, ManningN, Discharge, Depth],
            Operation::CriticalDepth => &[BaseWidth, SideSlope, Discharge],
            Operation::BroadCrestedLimitDepth => {
                &[BaseWidth, SideSlope, CrestHeight, WeirDischarge]
            }
            Operation::BroadCrestedDischarge => {
                &[BaseWidth, SideSlope, CrestHeight, ApproachDepth]
            }
            Operation::SharpCrestedDischarge => &[BaseWidth, CrestHeight, ApproachDepth],
        }
    }

    /// Inputs read when present.
    pub fn optional(self) -> &'static [Quantity] {
        match self {
            Operation::BroadCrestedDischarge => &[Quantity::CrestLength, Quantity::ManningN],
            _ => &[],
        }
    }

    /// Arrays written back to the batch, primary output first.
    pub fn outputs(self) -> &'static [Quantity] {
        use Quantity::*;
        match self {
            Operation::PipeDischarge | Operation::ManningDischarge => &[Discharge],
            Operation::PipeSlope | Operation::ManningSlope => &[Slope],
            Operation::PipeDiameter => &[Diameter],
            Operation::CriticalDepth => &[CriticalDepth],
            Operation::BroadCrestedLimitDepth => &[LimitDepth, CriticalDepth],
            Operation::BroadCrestedDischarge => &[WeirDischarge, CriticalDepth, Slope],
            Operation::SharpCrestedDischarge => &[WeirDischarge],
        }
    }

    pub fn output(self) -> Quantity {
        self.outputs()[0]
    }

    /// Whether the operation runs a fixed-point solve.
    pub fn is_iterative(self) -> bool {
        !matches!(
            self,
            Operation::PipeDischarge | Operation::ManningDischarge | Operation::ManningSlope
        )
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unknown operation name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownOperation(pub String);

impl fmt::Display for UnknownOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown operation '{}'", self.0)
    }
}

impl std::error::Error for UnknownOperation {}

impl FromStr for Operation {
    type Err = UnknownOperation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .iter()
            .copied()
            .find(|op| op.name() == s)
            .ok_or_else(|| UnknownOperation(s.to_string()))
    }
}

/// Outcome of one [`ProblemBatch::solve`] call.
#[derive(Clone, Debug, PartialEq)]
pub struct SolveReport {
    pub operation: Operation,
    /// Quantities written back, primary output first
    pub outputs: Vec<Quantity>,
    /// Fixed-point passes, 0 for direct formulas
    pub iterations: usize,
}

impl ProblemBatch {
    fn section(&self) -> ComponentResult<TrapezoidalSection<'_>> {
        Ok(TrapezoidalSection {
            base_width: self.require(Quantity::BaseWidth)?,
            side_slope: self.require(Quantity::SideSlope)?,
        })
    }

    fn pipe_wall(&self) -> ComponentResult<PipeWall<'_>> {
        Ok(PipeWall {
            roughness: self.require(Quantity::Roughness)?,
            viscosity: self.require(Quantity::Viscosity)?,
        })
    }

    /// Run `operation` on the stored arrays and write its outputs back.
    ///
    /// Inputs are only read; nothing is written if the solve fails.
    pub fn solve(&mut self, operation: Operation) -> ComponentResult<SolveReport> {
        use Quantity::*;
        let settings = *self.settings();
        settings.validate()?;

        let (values, iterations): (Vec<Vec<Real>>, usize) = match operation {
            Operation::PipeDischarge => {
                let q = ColebrookWhite::new(settings).discharge(
                    self.require(Slope)?,
                    self.require(Diameter)?,
                    self.pipe_wall()?,
                )?;
                (vec![q], 0)
            }
            Operation::PipeSlope => {
                let sol = ColebrookWhite::new(settings).slope(
                    self.require(Discharge)?,
                    self.require(Diameter)?,
                    self.pipe_wall()?,
                )?;
                (vec![sol.values], sol.iterations)
            }
            Operation::PipeDiameter => {
                let sol = ColebrookWhite::new(settings).diameter(
                    self.require(Discharge)?,
                    self.require(Slope)?,
                    self.pipe_wall()?,
                )?;
                (vec![sol.values], sol.iterations)
            }
            Operation::ManningDischarge => {
                let q = OpenChannel::new(settings).manning_discharge(
                    self.section()?,
                    self.require(ManningN)?,
                    self.require(Depth)?,
                    self.require(Slope)?,
                )?;
                (vec![q], 0)
            }
            Operation::ManningSlope => {
                let s = OpenChannel::new(settings).manning_slope(
                    self.section()?,
                    self.require(ManningN)?,
                    self.require(Discharge)?,
                    self.require(Depth)?,
                )?;
                (vec![s], 0)
            }
            Operation::CriticalDepth => {
                let sol = OpenChannel::new(settings)
                    .critical_depth(self.section()?, self.require(Discharge)?)?;
                (vec![sol.values], sol.iterations)
            }
            Operation::BroadCrestedLimitDepth => {
                let sol = BroadCrestedWeir::new(settings).limit_depth(
                    self.section()?,
                    self.require(CrestHeight)?,
                    self.require(WeirDischarge)?,
                )?;
                (vec![sol.limit_depth, sol.critical_depth], sol.iterations)
            }
            Operation::BroadCrestedDischarge => {
                let sol = BroadCrestedWeir::new(settings).discharge(
                    self.section()?,
                    BroadCrestedInputs {
                        crest_height: self.require(CrestHeight)?,
                        approach_depth: self.require(ApproachDepth)?,
                        crest_length: self.get(CrestLength),
                        manning_n: self.get(ManningN),
                    },
                )?;
                (
                    vec![sol.discharge, sol.critical_depth, sol.friction_slope],
                    sol.iterations,
                )
            }
            Operation::SharpCrestedDischarge => {
                let sol = SharpCrestedWeir::new(settings).discharge(
                    self.require(BaseWidth)?,
                    self.require(CrestHeight)?,
                    self.require(ApproachDepth)?,
                )?;
                (vec![sol.values], sol.iterations)
            }
        };

        let outputs = operation.outputs();
        for (&quantity, array) in outputs.iter().zip(values) {
            self.store(quantity, array);
        }
        tracing::debug!(
            operation = operation.name(),
            len = self.len(),
            iterations,
            "batch solved"
        );
        Ok(SolveReport {
            operation,
            outputs: outputs.to_vec(),
            iterations,
        })
    }
}
