// hy-core/src/units.rs

use uom::si::f64::{
    Acceleration as UomAcceleration, KinematicViscosity as UomKinematicViscosity,
    Length as UomLength, Ratio as UomRatio, VolumeRate as UomVolumeRate,
};

// Public canonical unit types (SI, f64)
pub type Accel = UomAcceleration;
pub type KinVisc = UomKinematicViscosity;
pub type Length = UomLength;
pub type Ratio = UomRatio;
pub type VolumeRate = UomVolumeRate;

#[inline]
pub fn m(v: f64) -> Length {
    use uom::si::length::meter;
    Length::new::<meter>(v)
}

#[inline]
pub fn mm(v: f64) -> Length {
    use uom::si::length::millimeter;
    Length::new::<millimeter>(v)
}

#[inline]
pub fn m3ps(v: f64) -> VolumeRate {
    use uom::si::volume_rate::cubic_meter_per_second;
    VolumeRate::new::<cubic_meter_per_second>(v)
}

#[inline]
pub fn lps(v: f64) -> VolumeRate {
    use uom::si::volume_rate::liter_per_second;
    VolumeRate::new::<liter_per_second>(v)
}

#[inline]
pub fn m2ps(v: f64) -> KinVisc {
    use uom::si::kinematic_viscosity::square_meter_per_second;
    KinVisc::new::<square_meter_per_second>(v)
}

#[inline]
pub fn mps2(v: f64) -> Accel {
    use uom::si::acceleration::meter_per_second_squared;
    Accel::new::<meter_per_second_squared>(v)
}

#[inline]
pub fn unitless(v: f64) -> Ratio {
    use uom::si::ratio::ratio;
    Ratio::new::<ratio>(v)
}

/// Strip typed lengths down to SI metres for the batch solvers.
pub fn lengths_si(values: &[Length]) -> Vec<f64> {
    values.iter().map(|l| l.value).collect()
}

/// Strip typed discharges down to m³/s for the batch solvers.
pub fn volume_rates_si(values: &[VolumeRate]) -> Vec<f64> {
    values.iter().map(|q| q.value).collect()
}

pub mod constants {
    use super::*;

    /// Standard gravity.
    pub const G0_MPS2: f64 = 9.806_65;

    /// Kinematic viscosity of water at 20 °C.
    pub const NU_WATER_20C_M2PS: f64 = 1.004e-6;

    #[inline]
    pub fn g0() -> Accel {
        mps2(G0_MPS2)
    }
}
