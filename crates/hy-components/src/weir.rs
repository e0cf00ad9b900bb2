//! Broad-crested and sharp-crested weirs in trapezoidal channels.

use crate::channel::{OpenChannel, TrapezoidalSection};
use crate::common::batch_len;
use crate::error::{ComponentError, ComponentResult};
use crate::quantity::Quantity;
use crate::settings::HydraulicSettings;
use hy_core::Real;
use hy_solver::{FixedPointSolution, Seeds, iterate, iterate_elementwise, map_elements};

/// Sharp-crested discharge seeds: first update sees Qv = 0.
const SHARP_SEEDS: Seeds = Seeds::new(0.0, 1.0);

/// Downstream limit depth for modular flow over a broad-crested weir.
#[derive(Clone, Debug, PartialEq)]
pub struct LimitDepthSolution {
    /// y3, m
    pub limit_depth: Vec<Real>,
    /// Critical depth over the crest used for the specific-force target, m
    pub critical_depth: Vec<Real>,
    pub iterations: usize,
}

/// Free-flow discharge over a broad-crested weir.
#[derive(Clone, Debug, PartialEq)]
pub struct BroadCrestedSolution {
    /// Qv, m³/s
    pub discharge: Vec<Real>,
    /// Critical depth over the crest from the last pass, m
    pub critical_depth: Vec<Real>,
    /// Manning friction slope over the crest from the last pass
    pub friction_slope: Vec<Real>,
    pub iterations: usize,
}

/// Per-call inputs of the broad-crested discharge solve.
#[derive(Clone, Copy, Debug)]
pub struct BroadCrestedInputs<'a> {
    /// p, m
    pub crest_height: &'a [Real],
    /// y1, fixed upstream depth, m
    pub approach_depth: &'a [Real],
    /// L, m. Absent means no friction loss along the crest.
    pub crest_length: Option<&'a [Real]>,
    /// Manning n over the crest, required with `crest_length`
    pub manning_n: Option<&'a [Real]>,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct BroadCrestedWeir {
    settings: HydraulicSettings,
}

impl BroadCrestedWeir {
    pub fn new(settings: HydraulicSettings) -> Self {
        Self { settings }
    }

    /// Downstream depth y3 at the modular-flow limit.
    ///
    /// The specific force at the crest (critical flow on top of height `p`)
    /// is matched downstream:
    ///
    /// ```text
    /// M  = (p+yC)²·(3b + 2z(p+yC))/6 + Qv²/(g·((b+2zp)·yC + z·yC²))
    /// y3 = √[(M − Qv²/(g·(b·y3' + z·y3'²))) / ((3b + 2z·y3')/6)]
    /// ```
    ///
    /// with `y3'` the previous iterate, seeded at `p + yC`. Zero discharge
    /// gives y3 = 0.
    pub fn limit_depth(
        &self,
        section: TrapezoidalSection<'_>,
        crest_height: &[Real],
        discharge: &[Real],
    ) -> ComponentResult<LimitDepthSolution> {
        self.settings.validate()?;
        let len = batch_len(&[
            (Quantity::BaseWidth, section.base_width),
            (Quantity::SideSlope, section.side_slope),
            (Quantity::CrestHeight, crest_height),
            (Quantity::WeirDischarge, discharge),
        ])?;
        let g = self.settings.gravity;
        let threshold = self.settings.parallel_threshold;

        let yc = OpenChannel::new(self.settings)
            .critical_depth(section, discharge)?
            .values;

        let target = map_elements(len, threshold, |i| {
            let q = discharge[i];
            if q == 0.0 {
                return 0.0;
            }
            let (b, z, p) = (section.base_width[i], section.side_slope[i], crest_height[i]);
            let h = p + yc[i];
            h * h * (3.0 * b + 2.0 * z * h) / 6.0
                + q * q / g / ((b + 2.0 * z * p) * yc[i] + z * yc[i] * yc[i])
        });

        let seed = map_elements(len, threshold, |i| crest_height[i] + yc[i]);
        let config = self.settings.fixed_point();
        let sol = iterate::<_, ComponentError>(seed, vec![0.0; len], &config, |prev| {
            Ok(map_elements(len, threshold, |i| {
                let q = discharge[i];
                if q == 0.0 {
                    return 0.0;
                }
                let (b, z, y) = (section.base_width[i], section.side_slope[i], prev[i]);
                let momentum = q * q / g / (b * y + z * y * y);
                let pressure = (3.0 * b + 2.0 * z * y) / 6.0;
                ((target[i] - momentum) / pressure).sqrt()
            }))
        })?;
        tracing::debug!(len, iterations = sol.iterations, "broad-crested limit depth solved");

        Ok(LimitDepthSolution {
            limit_depth: sol.values,
            critical_depth: yc,
            iterations: sol.iterations,
        })
    }

    /// Free-flow discharge for a fixed approach depth.
    ///
    /// Each pass takes the previous discharge as trial flow, assumes
    /// critical depth over the crest, charges the Manning friction loss
    /// `hf = L·I` along the crest and applies the weir head equation
    ///
    /// ```text
    /// Qv = b·√g·[(2/3)·(y1 − p + (Qv'/(b·y1))²/(2g) − hf)]^(3/2)
    /// ```
    pub fn discharge(
        &self,
        section: TrapezoidalSection<'_>,
        inputs: BroadCrestedInputs<'_>,
    ) -> ComponentResult<BroadCrestedSolution> {
        self.settings.validate()?;
        let mut checked = vec![
            (Quantity::BaseWidth, section.base_width),
            (Quantity::SideSlope, section.side_slope),
            (Quantity::CrestHeight, inputs.crest_height),
            (Quantity::ApproachDepth, inputs.approach_depth),
        ];
        let friction = match (inputs.crest_length, inputs.manning_n) {
            (Some(length), Some(n)) => {
                checked.push((Quantity::CrestLength, length));
                checked.push((Quantity::ManningN, n));
                Some((length, n))
            }
            (Some(_), None) => {
                return Err(ComponentError::MissingQuantity {
                    quantity: Quantity::ManningN,
                });
            }
            (None, _) => None,
        };
        let len = batch_len(&checked)?;

        let g = self.settings.gravity;
        let threshold = self.settings.parallel_threshold;
        let channel = OpenChannel::new(self.settings);
        let (p, y1) = (inputs.crest_height, inputs.approach_depth);

        let mut critical_depth = vec![0.0; len];
        let mut friction_slope = vec![0.0; len];
        let previous = vec![10.0 * self.settings.tolerance; len];
        let config = self.settings.fixed_point();

        let sol = iterate::<_, ComponentError>(vec![0.0; len], previous, &config, |prev| {
            critical_depth = channel.critical_depth(section, prev)?.values;
            friction_slope = match friction {
                Some((_, n)) => channel.manning_slope(section, n, prev, &critical_depth)?,
                None => vec![0.0; len],
            };
            let slope = &friction_slope;
            Ok(map_elements(len, threshold, |i| {
                let hf = friction.map_or(0.0, |(length, _)| length[i] * slope[i]);
                let b = section.base_width[i];
                let v = prev[i] / (b * y1[i]);
                let head = y1[i] - p[i] + v * v / 2.0 / g - hf;
                b * g.sqrt() * (2.0 / 3.0 * head).powf(1.5)
            }))
        })?;
        tracing::debug!(len, iterations = sol.iterations, "broad-crested discharge solved");

        Ok(BroadCrestedSolution {
            discharge: sol.values,
            critical_depth,
            friction_slope,
            iterations: sol.iterations,
        })
    }
}

/// Rouse contraction coefficient for a rectangular sharp-crested weir.
#[inline]
pub fn rouse_contraction(approach_depth: Real, crest_height: Real) -> Real {
    0.611 + 0.075 * (approach_depth - crest_height) / crest_height
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SharpCrestedWeir {
    settings: HydraulicSettings,
}

impl SharpCrestedWeir {
    pub fn new(settings: HydraulicSettings) -> Self {
        Self { settings }
    }

    /// Free-flow discharge over a rectangular sharp-crested weir:
    ///
    /// ```text
    /// Qv = b·Cc·√(2g)·(2/3)·[(y1 − p + hv)^(3/2) − hv^(3/2)]
    /// ```
    ///
    /// The approach velocity head `hv = (Qv'/(b·y1))²/(2g)` is zero unless
    /// `approach_velocity_head` is set (Rouse, Elementary Mechanics of
    /// Fluids, p. 93). Without it the first pass is already final.
    pub fn discharge(
        &self,
        base_width: &[Real],
        crest_height: &[Real],
        approach_depth: &[Real],
    ) -> ComponentResult<FixedPointSolution> {
        self.settings.validate()?;
        let len = batch_len(&[
            (Quantity::BaseWidth, base_width),
            (Quantity::CrestHeight, crest_height),
            (Quantity::ApproachDepth, approach_depth),
        ])?;
        let g = self.settings.gravity;
        let velocity_head = self.settings.approach_velocity_head;

        let sol = iterate_elementwise(len, SHARP_SEEDS, &self.settings.fixed_point(), |i, prev| {
            let (b, p, y1) = (base_width[i], crest_height[i], approach_depth[i]);
            let hv = if velocity_head {
                (prev / (b * y1)).powi(2) / 2.0 / g
            } else {
                0.0
            };
            let cc = rouse_contraction(y1, p);
            b * cc * (2.0 * g).sqrt() * 2.0 / 3.0 * ((y1 - p + hv).powf(1.5) - hv.powf(1.5))
        })?;
        tracing::debug!(len, iterations = sol.iterations, "sharp-crested discharge solved");
        Ok(sol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const G: Real = 9.806_65;

    fn section<'a>(b: &'a [Real], z: &'a [Real]) -> TrapezoidalSection<'a> {
        TrapezoidalSection {
            base_width: b,
            side_slope: z,
        }
    }

    #[test]
    fn sharp_crested_single_pass_value() {
        let weir = SharpCrestedWeir::default();
        let sol = weir.discharge(&[1.0], &[0.3], &[0.5]).unwrap();
        let cc = 0.611 + 0.075 * 0.2 / 0.3;
        let expected = 1.0 * cc * (2.0 * G).sqrt() * 2.0 / 3.0 * 0.2_f64.powf(1.5);
        assert!(((sol.values[0] - expected) / expected).abs() < 1e-9);
        assert!((sol.values[0] - 0.174_554_291_069_696_83).abs() < 1e-9);
        assert_eq!(sol.iterations, 2);
    }

    #[test]
    fn sharp_crested_velocity_head_raises_discharge() {
        let base = SharpCrestedWeir::default()
            .discharge(&[1.0, 2.0], &[0.3, 0.5], &[0.5, 0.9])
            .unwrap();
        let with_head = SharpCrestedWeir::new(HydraulicSettings {
            approach_velocity_head: true,
            ..HydraulicSettings::default()
        })
        .discharge(&[1.0, 2.0], &[0.3, 0.5], &[0.5, 0.9])
        .unwrap();
        assert!((with_head.values[0] - 0.182_423_156_8).abs() < 1e-6);
        assert!((with_head.values[1] - 1.060_269_584_5).abs() < 1e-5);
        assert!(with_head.values[0] > base.values[0]);
        assert!(with_head.iterations > base.iterations);
    }

    #[test]
    fn sharp_crested_below_crest_is_nan() {
        let sol = SharpCrestedWeir::default()
            .discharge(&[1.0, 1.0], &[0.5, 0.3], &[0.4, 0.5])
            .unwrap();
        assert!(sol.values[0].is_nan());
        assert!(sol.values[1] > 0.0);
    }

    #[test]
    fn broad_crested_discharge_with_crest_friction() {
        let weir = BroadCrestedWeir::default();
        let sec = section(&[2.0, 1.5], &[0.0, 0.5]);
        let sol = weir
            .discharge(
                sec,
                BroadCrestedInputs {
                    crest_height: &[0.4, 0.3],
                    approach_depth: &[1.0, 0.8],
                    crest_length: Some(&[1.0, 2.0]),
                    manning_n: Some(&[0.015, 0.015]),
                },
            )
            .unwrap();
        assert!((sol.discharge[0] - 1.716_320_818_7).abs() < 1e-5);
        assert!((sol.discharge[1] - 0.972_284_812_3).abs() < 1e-5);
        assert!(sol.friction_slope.iter().all(|s| *s > 0.0));
        assert!(sol.critical_depth.iter().all(|y| *y > 0.0));
    }

    #[test]
    fn broad_crested_without_crest_length_has_no_friction() {
        let weir = BroadCrestedWeir::default();
        let sec = section(&[2.0, 1.5], &[0.0, 0.5]);
        let sol = weir
            .discharge(
                sec,
                BroadCrestedInputs {
                    crest_height: &[0.4, 0.3],
                    approach_depth: &[1.0, 0.8],
                    crest_length: None,
                    manning_n: None,
                },
            )
            .unwrap();
        assert!((sol.discharge[0] - 1.739_699_148_996).abs() < 1e-5);
        assert!((sol.discharge[1] - 1.002_130_279_859).abs() < 1e-5);
        assert_eq!(sol.friction_slope, vec![0.0, 0.0]);
    }

    #[test]
    fn broad_crested_crest_length_needs_manning_n() {
        let weir = BroadCrestedWeir::default();
        let err = weir
            .discharge(
                section(&[2.0], &[0.0]),
                BroadCrestedInputs {
                    crest_height: &[0.4],
                    approach_depth: &[1.0],
                    crest_length: Some(&[1.0]),
                    manning_n: None,
                },
            )
            .unwrap_err();
        assert_eq!(
            err,
            ComponentError::MissingQuantity {
                quantity: Quantity::ManningN
            }
        );
    }

    #[test]
    fn limit_depth_matches_specific_force() {
        let weir = BroadCrestedWeir::new(HydraulicSettings::default().with_tolerance(1e-12));
        let b = [2.0, 1.5];
        let z = [0.0, 0.5];
        let p = [0.4, 0.3];
        let q = [1.716_320_818_749_524_5, 0.972_284_812_263_487];
        let sec = section(&b, &z);
        let sol = weir.limit_depth(sec, &p, &q).unwrap();

        assert!((sol.limit_depth[0] - 0.933_023).abs() < 1e-5);
        assert!((sol.limit_depth[1] - 0.694_249).abs() < 1e-5);
        for i in 0..2 {
            let (y3, yc) = (sol.limit_depth[i], sol.critical_depth[i]);
            let h = p[i] + yc;
            let upstream = h * h * (3.0 * b[i] + 2.0 * z[i] * h) / 6.0
                + q[i] * q[i] / G / ((b[i] + 2.0 * z[i] * p[i]) * yc + z[i] * yc * yc);
            let downstream = y3 * y3 * (3.0 * b[i] + 2.0 * z[i] * y3) / 6.0
                + q[i] * q[i] / G / (b[i] * y3 + z[i] * y3 * y3);
            assert!(((upstream - downstream) / upstream).abs() < 1e-9);
        }
    }

    #[test]
    fn limit_depth_zero_discharge_is_zero() {
        let weir = BroadCrestedWeir::default();
        let sol = weir
            .limit_depth(section(&[2.0, 2.0], &[0.0, 0.0]), &[0.4, 0.4], &[0.0, 1.0])
            .unwrap();
        assert_eq!(sol.limit_depth[0], 0.0);
        assert_eq!(sol.critical_depth[0], 0.0);
        assert!(sol.limit_depth[1] > 0.4);
    }
}
