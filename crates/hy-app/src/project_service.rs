//! Project loading, saving, validation, and introspection.

use std::path::Path;

use hy_project::schema::{CaseDef, Project};

use crate::error::{AppError, AppResult};

/// Summary of a case for listing.
#[derive(Debug, Clone)]
pub struct CaseSummary {
    pub id: String,
    pub name: String,
    pub instances: usize,
    pub operations: Vec<String>,
}

/// Summary of a data record for listing.
#[derive(Debug, Clone)]
pub struct RecordSummary {
    pub kind: &'static str,
    pub id: String,
    pub name: String,
    pub detail: String,
}

/// Load a project file (`.yaml`, `.yml` or `.json`), migrating and
/// validating it.
pub fn load_project(path: &Path) -> AppResult<Project> {
    Ok(hy_project::load(path)?)
}

/// Save a project, choosing the format from the extension.
pub fn save_project(path: &Path, project: &Project) -> AppResult<()> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => hy_project::save_json(path, project)?,
        _ => hy_project::save_yaml(path, project)?,
    }
    Ok(())
}

pub fn validate_project(project: &Project) -> AppResult<()> {
    hy_project::validate_project(project)?;
    Ok(())
}

pub fn list_cases(project: &Project) -> Vec<CaseSummary> {
    project
        .cases
        .iter()
        .map(|case| CaseSummary {
            id: case.id.clone(),
            name: case.name.clone(),
            instances: case.batch_len(),
            operations: case.operations.clone(),
        })
        .collect()
}

pub fn get_case<'a>(project: &'a Project, case_id: &str) -> AppResult<&'a CaseDef> {
    project
        .cases
        .iter()
        .find(|c| c.id == case_id)
        .ok_or_else(|| AppError::CaseNotFound(case_id.to_string()))
}

/// Build every data record and describe it in one line.
pub fn list_records(project: &Project) -> AppResult<Vec<RecordSummary>> {
    let mut out = Vec::new();
    for def in &project.pumps {
        let pump = hy_project::build_pump(def)?;
        out.push(RecordSummary {
            kind: "pump",
            id: def.id.clone(),
            name: pump.name.clone(),
            detail: format!(
                "{} of {} pumps running, H = {} + {}·Q + {}·Q²",
                pump.running(),
                pump.speed_ratios.len(),
                pump.head[0],
                pump.head[1],
                pump.head[2]
            ),
        });
    }
    for def in &project.circular_channels {
        let channel = hy_project::build_circular_channel(def)?;
        out.push(RecordSummary {
            kind: "circular_channel",
            id: def.id.clone(),
            name: channel.name.clone(),
            detail: format!("{} sections", channel.len()),
        });
    }
    for def in &project.drip_units {
        let unit = hy_project::build_drip_unit(def)?;
        out.push(RecordSummary {
            kind: "drip_unit",
            id: def.id.clone(),
            name: unit.name.clone(),
            detail: format!(
                "{} laterals x {} emitters",
                unit.laterals(),
                unit.emitters_per_lateral()
            ),
        });
    }
    Ok(out)
}
