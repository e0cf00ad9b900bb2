//! Schema migration framework.

use crate::ProjectError;
use crate::schema::Project;
use hy_components::Quantity;
use std::collections::BTreeMap;

pub const LATEST_VERSION: u32 = 1;

pub fn migrate_to_latest(mut project: Project) -> Result<Project, ProjectError> {
    while project.version < LATEST_VERSION {
        project = migrate_one_version(project)?;
    }
    Ok(project)
}

fn migrate_one_version(project: Project) -> Result<Project, ProjectError> {
    match project.version {
        0 => migrate_v0_to_v1(project),
        v => Err(ProjectError::Migration {
            what: format!("No migration path from version {}", v),
        }),
    }
}

/// Version 0 keyed inputs by symbol (`Q`, `yC`, `nu`); version 1 uses
/// quantity names.
fn migrate_v0_to_v1(mut project: Project) -> Result<Project, ProjectError> {
    for case in &mut project.cases {
        case.inputs = rekey(std::mem::take(&mut case.inputs));
        case.broadcast = rekey(std::mem::take(&mut case.broadcast));
    }
    project.version = 1;
    Ok(project)
}

fn rekey<V>(map: BTreeMap<String, V>) -> BTreeMap<String, V> {
    map.into_iter()
        .map(|(key, value)| (symbol_to_name(&key).unwrap_or(key), value))
        .collect()
}

fn symbol_to_name(symbol: &str) -> Option<String> {
    if symbol == "nu" {
        return Some(Quantity::Viscosity.name().to_string());
    }
    Quantity::ALL
        .iter()
        .find(|q| q.symbol() == symbol)
        .map(|q| q.name().to_string())
}
