//! Plain data records carried alongside hydraulic cases.
//!
//! None of these are evaluated by the solvers; they hold validated
//! parameters for pumping stations, circular channels and drip laterals.

use crate::common::{batch_len, check_finite, check_positive};
use crate::error::{ComponentError, ComponentResult};
use crate::quantity::Quantity;
use hy_core::Real;
use hy_core::units::constants::G0_MPS2;

/// Pumping station characteristic shared by identical pumps.
///
/// ## Curves
///
/// ```text
/// H(Q)   = a0 + a1·Q + a2·Q²
/// eta(Q) = b1·Q + b2·Q²
/// ```
///
/// `speed_ratios` holds one entry per pump in station order: 0 is stopped,
/// 1 is nominal rotation speed.
#[derive(Clone, Debug, PartialEq)]
pub struct PumpCurve {
    pub name: String,
    /// Head curve coefficients `[a0, a1, a2]`
    pub head: [Real; 3],
    /// Efficiency curve coefficients `[b1, b2]`
    pub efficiency: [Real; 2],
    pub speed_ratios: Vec<Real>,
}

impl PumpCurve {
    /// # Errors
    /// Non-finite coefficients, or a speed ratio that is negative or not finite.
    pub fn new(
        name: impl Into<String>,
        head: [Real; 3],
        efficiency: [Real; 2],
        speed_ratios: Vec<Real>,
    ) -> ComponentResult<Self> {
        for c in head.iter().chain(efficiency.iter()) {
            check_finite(*c, "pump curve coefficient")?;
        }
        for r in &speed_ratios {
            check_finite(*r, "pump speed ratio")?;
            if *r < 0.0 {
                return Err(ComponentError::InvalidArg {
                    what: "pump speed ratio must be non-negative",
                });
            }
        }
        Ok(Self {
            name: name.into(),
            head,
            efficiency,
            speed_ratios,
        })
    }

    /// Number of pumps turning (speed ratio above zero).
    pub fn running(&self) -> usize {
        self.speed_ratios.iter().filter(|r| **r > 0.0).count()
    }
}

/// Batch of circular channels partially filled to depth `y`.
#[derive(Clone, Debug, PartialEq)]
pub struct CircularChannel {
    pub name: String,
    pub discharge: Vec<Real>,
    pub slope: Vec<Real>,
    pub depth: Vec<Real>,
    pub diameter: Vec<Real>,
    pub manning_n: Vec<Real>,
    pub gravity: Real,
}

impl CircularChannel {
    pub fn new(
        name: impl Into<String>,
        discharge: Vec<Real>,
        slope: Vec<Real>,
        depth: Vec<Real>,
        diameter: Vec<Real>,
        manning_n: Vec<Real>,
    ) -> ComponentResult<Self> {
        batch_len(&[
            (Quantity::Discharge, discharge.as_slice()),
            (Quantity::Slope, slope.as_slice()),
            (Quantity::Depth, depth.as_slice()),
            (Quantity::Diameter, diameter.as_slice()),
            (Quantity::ManningN, manning_n.as_slice()),
        ])?;
        Ok(Self {
            name: name.into(),
            discharge,
            slope,
            depth,
            diameter,
            manning_n,
            gravity: G0_MPS2,
        })
    }

    pub fn len(&self) -> usize {
        self.discharge.len()
    }

    pub fn is_empty(&self) -> bool {
        self.discharge.is_empty()
    }
}

/// Drip irrigation unit: laterals fed by a manifold.
#[derive(Clone, Debug, PartialEq)]
pub struct DripIrrigationUnit {
    pub name: String,
    /// Lateral inner diameter, m
    pub lateral_diameter: Real,
    /// Manifold inner diameter, m
    pub manifold_diameter: Real,
    pub lateral_length: Real,
    pub manifold_length: Real,
    /// Distance between emitters along a lateral, m
    pub emitter_spacing: Real,
    /// Distance between laterals along the manifold, m
    pub lateral_spacing: Real,
    /// Equivalent length of one emitter insertion, m
    pub emitter_equivalent_length: Real,
    /// Equivalent length of one lateral connection, m
    pub lateral_equivalent_length: Real,
    pub gravity: Real,
}

impl DripIrrigationUnit {
    /// Check every geometric parameter is finite and positive, equivalent
    /// lengths finite and non-negative.
    pub fn validate(&self) -> ComponentResult<()> {
        let positive = [
            (self.lateral_diameter, "lateral diameter must be positive"),
            (self.manifold_diameter, "manifold diameter must be positive"),
            (self.lateral_length, "lateral length must be positive"),
            (self.manifold_length, "manifold length must be positive"),
            (self.emitter_spacing, "emitter spacing must be positive"),
            (self.lateral_spacing, "lateral spacing must be positive"),
            (self.gravity, "gravity must be positive"),
        ];
        for (value, what) in positive {
            check_positive(value, what)?;
        }
        for value in [
            self.emitter_equivalent_length,
            self.lateral_equivalent_length,
        ] {
            check_finite(value, "equivalent length")?;
            if value < 0.0 {
                return Err(ComponentError::InvalidArg {
                    what: "equivalent length must be non-negative",
                });
            }
        }
        Ok(())
    }

    /// Emitters on one lateral.
    pub fn emitters_per_lateral(&self) -> usize {
        (self.lateral_length / self.emitter_spacing).floor() as usize
    }

    /// Laterals along the manifold.
    pub fn laterals(&self) -> usize {
        (self.manifold_length / self.lateral_spacing).floor() as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drip() -> DripIrrigationUnit {
        DripIrrigationUnit {
            name: "sector-1".into(),
            lateral_diameter: 0.0136,
            manifold_diameter: 0.04,
            lateral_length: 50.0,
            manifold_length: 30.0,
            emitter_spacing: 0.5,
            lateral_spacing: 1.5,
            emitter_equivalent_length: 0.2,
            lateral_equivalent_length: 0.5,
            gravity: G0_MPS2,
        }
    }

    #[test]
    fn pump_counts_running() {
        let pump = PumpCurve::new("station", [40.0, 0.0, -800.0], [9.0, -40.0], vec![1.0, 0.8, 0.0])
            .unwrap();
        assert_eq!(pump.running(), 2);
    }

    #[test]
    fn pump_rejects_negative_speed() {
        let err = PumpCurve::new("station", [40.0, 0.0, -800.0], [9.0, -40.0], vec![-0.1])
            .unwrap_err();
        assert!(matches!(err, ComponentError::InvalidArg { .. }));

        let err = PumpCurve::new("station", [Real::NAN, 0.0, 0.0], [0.0, 0.0], vec![])
            .unwrap_err();
        assert!(matches!(err, ComponentError::NonPhysical { .. }));
    }

    #[test]
    fn circular_lengths_must_match() {
        let ok = CircularChannel::new(
            "culvert",
            vec![0.5, 1.0],
            vec![0.001, 0.002],
            vec![0.3, 0.4],
            vec![1.0, 1.0],
            vec![0.013, 0.013],
        )
        .unwrap();
        assert_eq!(ok.len(), 2);
        assert_eq!(ok.gravity, G0_MPS2);

        let err = CircularChannel::new(
            "culvert",
            vec![0.5],
            vec![0.001],
            vec![0.3, 0.4],
            vec![1.0],
            vec![0.013],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ComponentError::LengthMismatch {
                quantity: Quantity::Depth,
                ..
            }
        ));
    }

    #[test]
    fn drip_layout_counts() {
        let unit = drip();
        unit.validate().unwrap();
        assert_eq!(unit.emitters_per_lateral(), 100);
        assert_eq!(unit.laterals(), 20);
    }

    #[test]
    fn drip_rejects_zero_spacing() {
        let unit = DripIrrigationUnit {
            emitter_spacing: 0.0,
            ..drip()
        };
        assert!(unit.validate().is_err());
    }
}
