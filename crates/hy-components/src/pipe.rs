//! Pressurized pipe flow with the Colebrook-White friction law.
//!
//! Darcy-Weisbach combined with Colebrook-White gives, per instance,
//!
//! ```text
//! Q = (π D²/4) · √(2 g I D) · (−2 log10(k/(3.7 D) + 2.51 ν/(D √(2 g I D))))
//! ```
//!
//! Discharge follows directly. Slope and diameter appear inside the
//! logarithm as well, so they are found by fixed-point iteration with the
//! previous iterate substituted inside the log term.

use crate::common::{batch_len, degenerate};
use crate::error::ComponentResult;
use crate::quantity::Quantity;
use crate::settings::HydraulicSettings;
use hy_core::Real;
use hy_solver::{FixedPointSolution, Seeds, iterate_elementwise, map_elements};
use std::f64::consts::PI;

/// Reynolds proxy `4Q/(πDν)` below which the slope solve uses Hagen-Poiseuille.
pub const LAMINAR_LIMIT: Real = 2400.0;

/// Slope seeds: first update sees I = 1e-6.
const SLOPE_SEEDS: Seeds = Seeds::new(1e-6, 1.0);

/// Diameter seeds: first update sees D = 1 m.
const DIAMETER_SEEDS: Seeds = Seeds::new(1.0, 0.0);

/// Wall and fluid properties shared by every Colebrook-White entry point.
#[derive(Clone, Copy, Debug)]
pub struct PipeWall<'a> {
    /// Absolute roughness k, m
    pub roughness: &'a [Real],
    /// Kinematic viscosity ν, m²/s
    pub viscosity: &'a [Real],
}

/// `4Q/(πDν)`, the pipe Reynolds number written in terms of discharge.
#[inline]
pub fn reynolds_proxy(discharge: Real, diameter: Real, viscosity: Real) -> Real {
    discharge / PI / diameter * 4.0 / viscosity
}

/// `−2·log10(k/(3.7D) + 2.51ν/(D·root))` with `root = √(2 g I D)`.
#[inline]
fn colebrook_term(roughness: Real, diameter: Real, viscosity: Real, root: Real) -> Real {
    -2.0 * (roughness / 3.7 / diameter + 2.51 * viscosity / diameter / root).log10()
}

/// Batch Colebrook-White solver.
#[derive(Clone, Copy, Debug, Default)]
pub struct ColebrookWhite {
    settings: HydraulicSettings,
}

impl ColebrookWhite {
    pub fn new(settings: HydraulicSettings) -> Self {
        Self { settings }
    }

    /// Discharge from slope and diameter. Zero slope or diameter gives Q = 0.
    pub fn discharge(
        &self,
        slope: &[Real],
        diameter: &[Real],
        wall: PipeWall<'_>,
    ) -> ComponentResult<Vec<Real>> {
        self.settings.validate()?;
        let len = batch_len(&[
            (Quantity::Slope, slope),
            (Quantity::Diameter, diameter),
            (Quantity::Roughness, wall.roughness),
            (Quantity::Viscosity, wall.viscosity),
        ])?;
        let g = self.settings.gravity;

        let q = map_elements(len, self.settings.parallel_threshold, |i| {
            let (s, d) = (slope[i], diameter[i]);
            if degenerate(s, d) {
                return 0.0;
            }
            let root = (2.0 * g * s * d).sqrt();
            PI * d * d / 4.0 * root * colebrook_term(wall.roughness[i], d, wall.viscosity[i], root)
        });
        tracing::debug!(len, "colebrook-white discharge evaluated");
        Ok(q)
    }

    /// Friction slope from discharge and diameter.
    ///
    /// Instances with `4Q/(πDν) < 2400` take the Hagen-Poiseuille slope
    /// `128νQ/(πgD⁴)`, which does not depend on the previous iterate. Zero
    /// discharge or diameter gives I = 0.
    pub fn slope(
        &self,
        discharge: &[Real],
        diameter: &[Real],
        wall: PipeWall<'_>,
    ) -> ComponentResult<FixedPointSolution> {
        self.settings.validate()?;
        let len = batch_len(&[
            (Quantity::Discharge, discharge),
            (Quantity::Diameter, diameter),
            (Quantity::Roughness, wall.roughness),
            (Quantity::Viscosity, wall.viscosity),
        ])?;
        let g = self.settings.gravity;

        let sol = iterate_elementwise(len, SLOPE_SEEDS, &self.settings.fixed_point(), |i, prev| {
            let (q, d) = (discharge[i], diameter[i]);
            if degenerate(q, d) {
                return 0.0;
            }
            let (k, nu) = (wall.roughness[i], wall.viscosity[i]);
            if reynolds_proxy(q, d, nu) < LAMINAR_LIMIT {
                128.0 * nu * q / PI / g / d.powi(4)
            } else {
                let root = (2.0 * g * prev * d).sqrt();
                let v = 4.0 * q / PI / (d * d);
                (v / colebrook_term(k, d, nu, root)).powi(2) / 2.0 / g / d
            }
        })?;
        tracing::debug!(len, iterations = sol.iterations, "colebrook-white slope solved");
        Ok(sol)
    }

    /// Diameter from discharge and slope. Zero discharge or slope gives D = 0.
    pub fn diameter(
        &self,
        discharge: &[Real],
        slope: &[Real],
        wall: PipeWall<'_>,
    ) -> ComponentResult<FixedPointSolution> {
        self.settings.validate()?;
        let len = batch_len(&[
            (Quantity::Discharge, discharge),
            (Quantity::Slope, slope),
            (Quantity::Roughness, wall.roughness),
            (Quantity::Viscosity, wall.viscosity),
        ])?;
        let g = self.settings.gravity;

        let sol = iterate_elementwise(
            len,
            DIAMETER_SEEDS,
            &self.settings.fixed_point(),
            |i, prev| {
                let (q, s) = (discharge[i], slope[i]);
                if degenerate(q, s) {
                    return 0.0;
                }
                let root = (2.0 * g * s * prev).sqrt();
                let log = colebrook_term(wall.roughness[i], prev, wall.viscosity[i], root);
                (4.0 * q / PI / (2.0 * g * s).sqrt() / log).powf(2.0 / 5.0)
            },
        )?;
        tracing::debug!(len, iterations = sol.iterations, "colebrook-white diameter solved");
        Ok(sol)
    }
}
