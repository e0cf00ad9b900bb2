//! Conversion of record definitions into validated component records.

use crate::schema::{CircularChannelDef, DripUnitDef, PumpDef};
use hy_components::{
    CircularChannel, ComponentResult, DripIrrigationUnit, HydraulicSettings, PumpCurve,
    common::check_finite,
};

pub fn build_pump(def: &PumpDef) -> ComponentResult<PumpCurve> {
    PumpCurve::new(
        def.name.clone(),
        def.head,
        def.efficiency,
        def.speed_ratios.clone(),
    )
}

pub fn build_circular_channel(def: &CircularChannelDef) -> ComponentResult<CircularChannel> {
    let mut channel = CircularChannel::new(
        def.name.clone(),
        def.discharge_m3ps.clone(),
        def.slope.clone(),
        def.depth_m.clone(),
        def.diameter_m.clone(),
        def.manning_n.clone(),
    )?;
    if let Some(g) = def.gravity_mps2 {
        check_finite(g, "circular channel gravity")?;
        channel.gravity = g;
    }
    Ok(channel)
}

pub fn build_drip_unit(def: &DripUnitDef) -> ComponentResult<DripIrrigationUnit> {
    let unit = DripIrrigationUnit {
        name: def.name.clone(),
        lateral_diameter: def.lateral_diameter_m,
        manifold_diameter: def.manifold_diameter_m,
        lateral_length: def.lateral_length_m,
        manifold_length: def.manifold_length_m,
        emitter_spacing: def.emitter_spacing_m,
        lateral_spacing: def.lateral_spacing_m,
        emitter_equivalent_length: def.emitter_equivalent_length_m,
        lateral_equivalent_length: def.lateral_equivalent_length_m,
        gravity: def
            .gravity_mps2
            .unwrap_or(HydraulicSettings::default().gravity),
    };
    unit.validate()?;
    Ok(unit)
}
