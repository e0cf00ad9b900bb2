//! Open-channel flow in trapezoidal sections.
//!
//! Manning discharge and slope are direct. Critical depth is a fixed point of
//! the critical-flow condition `Q²·T = g·A³`, where `T = b + 2z·y` is the top
//! width and `A = (b + z·y)·y` the flow area, rearranged as
//!
//! ```text
//! yC = [Q²·(b + 2z·yC_prev) / (g·(b + z·yC_prev)³)]^(1/3)
//! ```

use crate::common::{batch_len, degenerate};
use crate::error::ComponentResult;
use crate::quantity::Quantity;
use crate::settings::{FaultPolicy, HydraulicSettings, PerimeterConvention};
use hy_core::Real;
use hy_solver::{FixedPointSolution, Seeds, iterate_elementwise, map_elements};

const CRITICAL_DEPTH_SEEDS: Seeds = Seeds::new(1.0, 0.0);

/// Trapezoidal section geometry, one entry per instance.
#[derive(Clone, Copy, Debug)]
pub struct TrapezoidalSection<'a> {
    /// Base width b, m
    pub base_width: &'a [Real],
    /// Side slope z (1 vertical : z horizontal)
    pub side_slope: &'a [Real],
}

impl TrapezoidalSection<'_> {
    /// `A(y) = b·y + z·y²`
    #[inline]
    pub fn area(&self, i: usize, y: Real) -> Real {
        self.base_width[i] * y + self.side_slope[i] * y * y
    }

    /// `T(y) = b + 2z·y`
    #[inline]
    pub fn top_width(&self, i: usize, y: Real) -> Real {
        self.base_width[i] + 2.0 * self.side_slope[i] * y
    }

    /// `b + sides·y·√(1+z²)`; `sides` is 2 for the full trapezoid.
    #[inline]
    pub fn wetted_perimeter(&self, i: usize, y: Real, sides: Real) -> Real {
        let z = self.side_slope[i];
        self.base_width[i] + sides * y * (1.0 + z * z).sqrt()
    }

    fn check(&self, rest: &[(Quantity, &[Real])]) -> ComponentResult<usize> {
        let mut inputs = vec![
            (Quantity::BaseWidth, self.base_width),
            (Quantity::SideSlope, self.side_slope),
        ];
        inputs.extend_from_slice(rest);
        batch_len(&inputs)
    }
}

/// Manning and critical-flow relations for a batch of trapezoidal channels.
#[derive(Clone, Copy, Debug, Default)]
pub struct OpenChannel {
    settings: HydraulicSettings,
}

impl OpenChannel {
    pub fn new(settings: HydraulicSettings) -> Self {
        Self { settings }
    }

    fn discharge_sides(&self) -> Real {
        match self.settings.perimeter {
            PerimeterConvention::Standard => 2.0,
            PerimeterConvention::Reference => 1.0,
        }
    }

    /// `Q = (1/n)·A^(5/3)/P^(2/3)·√I`. Zero slope or depth gives Q = 0.
    pub fn manning_discharge(
        &self,
        section: TrapezoidalSection<'_>,
        manning_n: &[Real],
        depth: &[Real],
        slope: &[Real],
    ) -> ComponentResult<Vec<Real>> {
        self.settings.validate()?;
        let len = section.check(&[
            (Quantity::ManningN, manning_n),
            (Quantity::Depth, depth),
            (Quantity::Slope, slope),
        ])?;
        let sides = self.discharge_sides();

        Ok(map_elements(len, self.settings.parallel_threshold, |i| {
            let (y, s) = (depth[i], slope[i]);
            if degenerate(s, y) {
                return 0.0;
            }
            1.0 / manning_n[i] * section.area(i, y).powf(5.0 / 3.0)
                / section.wetted_perimeter(i, y, sides).powf(2.0 / 3.0)
                * s.sqrt()
        }))
    }

    /// `I = [Q·n/A^(5/3)·P^(2/3)]²`. Zero discharge or depth gives I = 0.
    ///
    /// Non-finite results outside the zero guard are arithmetic faults and
    /// fall back to I = 0, per instance or for the whole batch depending on
    /// the configured [`FaultPolicy`].
    pub fn manning_slope(
        &self,
        section: TrapezoidalSection<'_>,
        manning_n: &[Real],
        discharge: &[Real],
        depth: &[Real],
    ) -> ComponentResult<Vec<Real>> {
        self.settings.validate()?;
        let len = section.check(&[
            (Quantity::ManningN, manning_n),
            (Quantity::Discharge, discharge),
            (Quantity::Depth, depth),
        ])?;

        let mut slope = map_elements(len, self.settings.parallel_threshold, |i| {
            let (q, y) = (discharge[i], depth[i]);
            if degenerate(q, y) {
                return 0.0;
            }
            (q * manning_n[i] / section.area(i, y).powf(5.0 / 3.0)
                * section.wetted_perimeter(i, y, 2.0).powf(2.0 / 3.0))
            .powi(2)
        });

        let faulted = slope.iter().filter(|s| !s.is_finite()).count();
        if faulted > 0 {
            match self.settings.fault_policy {
                FaultPolicy::PerElement => {
                    tracing::warn!(faulted, len, "manning slope faulted, zeroing instances");
                    slope.iter_mut().filter(|s| !s.is_finite()).for_each(|s| *s = 0.0);
                }
                FaultPolicy::WholeBatch => {
                    tracing::warn!(faulted, len, "manning slope faulted, zeroing batch");
                    slope.fill(0.0);
                }
            }
        }
        Ok(slope)
    }

    /// Critical depth for each instance. Zero discharge gives yC = 0.
    pub fn critical_depth(
        &self,
        section: TrapezoidalSection<'_>,
        discharge: &[Real],
    ) -> ComponentResult<FixedPointSolution> {
        self.settings.validate()?;
        let len = section.check(&[(Quantity::Discharge, discharge)])?;
        let g = self.settings.gravity;

        let sol = iterate_elementwise(
            len,
            CRITICAL_DEPTH_SEEDS,
            &self.settings.fixed_point(),
            |i, prev| {
                let q = discharge[i];
                if q == 0.0 {
                    return 0.0;
                }
                let (b, z) = (section.base_width[i], section.side_slope[i]);
                (q * q * (b + 2.0 * z * prev) / g / (b + z * prev).powi(3)).powf(1.0 / 3.0)
            },
        )?;
        tracing::debug!(len, iterations = sol.iterations, "critical depth solved");
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
    fn manning_discharge_matches_closed_form() {
        let ch = OpenChannel::default();
        let q = ch
            .manning_discharge(section(&[2.0], &[1.0]), &[0.02], &[1.0], &[0.001])
            .unwrap();
        // A = 3, P = 2 + 2√2
        let p: Real = 2.0 + 2.0 * 2.0_f64.sqrt();
        let expected = 1.0 / 0.02 * 3.0_f64.powf(5.0 / 3.0) / p.powf(2.0 / 3.0) * 0.001_f64.sqrt();
        assert!(((q[0] - expected) / expected).abs() < 1e-9);
        assert!((q[0] - 3.453_835_440_184_879).abs() < 1e-9);
    }

    #[test]
    fn reference_perimeter_uses_single_side_for_discharge() {
        let settings = HydraulicSettings {
            perimeter: PerimeterConvention::Reference,
            ..HydraulicSettings::default()
        };
        let ch = OpenChannel::new(settings);
        let q = ch
            .manning_discharge(section(&[2.0], &[1.0]), &[0.02], &[1.0], &[0.001])
            .unwrap();
        assert!((q[0] - 4.351_559_973_961_854).abs() < 1e-9);

        // slope keeps the full perimeter under either convention
        let std = OpenChannel::default();
        let a = ch
            .manning_slope(section(&[2.0], &[1.0]), &[0.02], &[3.0], &[1.0])
            .unwrap();
        let b = std
            .manning_slope(section(&[2.0], &[1.0]), &[0.02], &[3.0], &[1.0])
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn manning_slope_inverts_discharge() {
        let ch = OpenChannel::default();
        let sec = section(&[2.0, 1.0], &[1.0, 0.5]);
        let q = ch
            .manning_discharge(sec, &[0.02, 0.015], &[1.0, 0.4], &[0.001, 0.003])
            .unwrap();
        let s = ch.manning_slope(sec, &[0.02, 0.015], &q, &[1.0, 0.4]).unwrap();
        assert!((s[0] - 0.001).abs() < 1e-15);
        assert!((s[1] - 0.003).abs() < 1e-15);
    }

    #[test]
    fn manning_zero_guards() {
        let ch = OpenChannel::default();
        let sec = section(&[2.0, 2.0], &[1.0, 1.0]);
        let q = ch
            .manning_discharge(sec, &[0.02; 2], &[0.0, 1.0], &[0.001, 0.0])
            .unwrap();
        assert_eq!(q, vec![0.0, 0.0]);
        let s = ch
            .manning_slope(sec, &[0.02; 2], &[0.0, 3.0], &[1.0, 0.0])
            .unwrap();
        assert_eq!(s, vec![0.0, 0.0]);
    }

    #[test]
    fn manning_slope_fault_policies() {
        // Negative depth makes A negative and A^(5/3) NaN
        let sec = section(&[2.0, 2.0], &[0.0, 1.0]);
        let n = [0.02; 2];
        let q = [1.0, 3.0];
        let y = [-0.5, 1.0];

        let per_element = OpenChannel::default()
            .manning_slope(sec, &n, &q, &y)
            .unwrap();
        assert_eq!(per_element[0], 0.0);
        assert!(per_element[1] > 0.0);

        let whole = OpenChannel::new(HydraulicSettings {
            fault_policy: FaultPolicy::WholeBatch,
            ..HydraulicSettings::default()
        })
        .manning_slope(sec, &n, &q, &y)
        .unwrap();
        assert_eq!(whole, vec![0.0, 0.0]);
    }

    #[test]
    fn critical_depth_satisfies_critical_flow_condition() {
        let ch = OpenChannel::new(HydraulicSettings::default().with_tolerance(1e-12));
        let b = [2.0, 2.0, 1.0, 1.0];
        let z = [1.0, 1.0, 0.0, 2.0];
        let q = [3.0, 0.0, 1.0, 10.0];
        let sec = section(&b, &z);
        let yc = ch.critical_depth(sec, &q).unwrap().values;

        assert_eq!(yc[1], 0.0);
        for i in [0, 2, 3] {
            let lhs = q[i] * q[i] * sec.top_width(i, yc[i]);
            let rhs = G * sec.area(i, yc[i]).powi(3);
            assert!(((lhs - rhs) / lhs).abs() < 1e-9, "instance {i}: {lhs} vs {rhs}");
        }
        // rectangular section has the closed form (q²/(g b²))^(1/3)
        let rect = (1.0 / (G * 1.0)).powf(1.0 / 3.0);
        assert!((yc[2] - rect).abs() < 1e-12);
        assert!((yc[0] - 0.555_167).abs() < 1e-5);
    }
}
