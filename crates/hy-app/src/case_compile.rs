//! Turn a case definition into a ready-to-solve batch.

use hy_components::{
    FaultPolicy, HydraulicSettings, Operation, PerimeterConvention, ProblemBatch, Quantity,
};
use hy_project::schema::{CaseDef, FaultPolicyDef, PerimeterDef, Project, SettingsDef};

use crate::error::{AppError, AppResult};

/// A case compiled against its project: batch plus ordered operations.
#[derive(Debug, Clone)]
pub struct CompiledCase {
    pub id: String,
    pub name: String,
    pub batch: ProblemBatch,
    pub operations: Vec<Operation>,
}

/// Resolve a settings definition over the built-in defaults.
pub fn build_settings(def: &SettingsDef) -> AppResult<HydraulicSettings> {
    let defaults = HydraulicSettings::default();
    let settings = HydraulicSettings {
        gravity: def.gravity_mps2.unwrap_or(defaults.gravity),
        tolerance: def.tolerance.unwrap_or(defaults.tolerance),
        max_iterations: def.max_iterations.unwrap_or(defaults.max_iterations),
        parallel_threshold: def.parallel_threshold.unwrap_or(defaults.parallel_threshold),
        approach_velocity_head: def
            .approach_velocity_head
            .unwrap_or(defaults.approach_velocity_head),
        perimeter: match def.perimeter {
            Some(PerimeterDef::Standard) => PerimeterConvention::Standard,
            Some(PerimeterDef::Reference) => PerimeterConvention::Reference,
            None => defaults.perimeter,
        },
        fault_policy: match def.fault_policy {
            Some(FaultPolicyDef::PerElement) => FaultPolicy::PerElement,
            Some(FaultPolicyDef::WholeBatch) => FaultPolicy::WholeBatch,
            None => defaults.fault_policy,
        },
    };
    settings.validate()?;
    Ok(settings)
}

fn parse_quantity(name: &str) -> AppResult<Quantity> {
    name.parse()
        .map_err(|e: hy_components::UnknownQuantity| AppError::Compile(e.to_string()))
}

pub fn compile_case(project: &Project, case: &CaseDef) -> AppResult<CompiledCase> {
    let settings_def = match &case.settings {
        Some(over) => project.settings.overlaid(over),
        None => project.settings.clone(),
    };
    let settings = build_settings(&settings_def)?;

    let mut batch = ProblemBatch::new(case.batch_len()).with_settings(settings);
    for (name, values) in &case.inputs {
        batch.set(parse_quantity(name)?, values.clone())?;
    }
    for (name, value) in &case.broadcast {
        batch.fill(parse_quantity(name)?, *value);
    }

    let operations = case
        .operations
        .iter()
        .map(|name| {
            name.parse::<Operation>()
                .map_err(|e| AppError::Compile(e.to_string()))
        })
        .collect::<AppResult<Vec<_>>>()?;

    tracing::debug!(
        case = case.id.as_str(),
        instances = batch.len(),
        operations = operations.len(),
        "case compiled"
    );
    Ok(CompiledCase {
        id: case.id.clone(),
        name: case.name.clone(),
        batch,
        operations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn project() -> Project {
        Project {
            version: 1,
            name: "p".into(),
            settings: SettingsDef {
                tolerance: Some(1e-9),
                ..SettingsDef::default()
            },
            cases: vec![CaseDef {
                id: "c".into(),
                name: "c".into(),
                settings: Some(SettingsDef {
                    perimeter: Some(PerimeterDef::Reference),
                    ..SettingsDef::default()
                }),
                operations: vec!["manning_discharge".into()],
                inputs: BTreeMap::from([("depth".to_string(), vec![1.0, 0.5])]),
                broadcast: BTreeMap::from([
                    ("base_width".to_string(), 2.0),
                    ("side_slope".to_string(), 1.0),
                    ("manning_n".to_string(), 0.02),
                    ("slope".to_string(), 0.001),
                ]),
            }],
            pumps: vec![],
            circular_channels: vec![],
            drip_units: vec![],
        }
    }

    #[test]
    fn settings_layer_case_over_project() {
        let p = project();
        let compiled = compile_case(&p, &p.cases[0]).unwrap();
        let s = compiled.batch.settings();
        assert_eq!(s.tolerance, 1e-9);
        assert_eq!(s.perimeter, PerimeterConvention::Reference);
        assert_eq!(s.max_iterations, HydraulicSettings::default().max_iterations);
    }

    #[test]
    fn broadcast_fills_every_instance() {
        let p = project();
        let compiled = compile_case(&p, &p.cases[0]).unwrap();
        assert_eq!(compiled.batch.len(), 2);
        assert_eq!(
            compiled.batch.get(Quantity::ManningN),
            Some(&[0.02, 0.02][..])
        );
        assert_eq!(compiled.operations, vec![Operation::ManningDischarge]);
    }

    #[test]
    fn invalid_gravity_fails_compile() {
        let def = SettingsDef {
            gravity_mps2: Some(-9.8),
            ..SettingsDef::default()
        };
        assert!(build_settings(&def).is_err());
    }
}
