//! Case execution and report writing.

use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;
use std::time::Instant;

use hy_project::schema::Project;
use serde::Serialize;

use crate::case_compile::{CompiledCase, compile_case};
use crate::error::{AppError, AppResult};
use crate::project_service;

/// One operation executed within a case.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StepReport {
    pub operation: String,
    pub iterations: usize,
    pub outputs: Vec<String>,
}

/// Everything a case run produced.
#[derive(Debug, Clone, Serialize)]
pub struct CaseReport {
    pub case_id: String,
    pub name: String,
    pub instances: usize,
    pub steps: Vec<StepReport>,
    /// Final arrays of every quantity written by a step
    pub outputs: BTreeMap<String, Vec<f64>>,
    pub solve_time_s: f64,
}

/// Report serialization format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Yaml,
    Json,
}

impl FromStr for ReportFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Ok(ReportFormat::Yaml),
            "json" => Ok(ReportFormat::Json),
            other => Err(AppError::InvalidInput(format!(
                "unknown report format '{}', expected yaml or json",
                other
            ))),
        }
    }
}

/// Run every operation of a compiled case, in order.
pub fn run_compiled(mut compiled: CompiledCase) -> AppResult<CaseReport> {
    let started = Instant::now();
    let mut steps = Vec::with_capacity(compiled.operations.len());
    let mut written = Vec::new();

    for &operation in &compiled.operations {
        let report = compiled
            .batch
            .solve(operation)
            .map_err(|e| AppError::Solver {
                case: compiled.id.clone(),
                operation: operation.name().to_string(),
                message: e.to_string(),
            })?;
        for q in &report.outputs {
            if !written.contains(q) {
                written.push(*q);
            }
        }
        steps.push(StepReport {
            operation: operation.name().to_string(),
            iterations: report.iterations,
            outputs: report.outputs.iter().map(|q| q.name().to_string()).collect(),
        });
    }

    let outputs = written
        .into_iter()
        .filter_map(|q| {
            compiled
                .batch
                .get(q)
                .map(|values| (q.name().to_string(), values.to_vec()))
        })
        .collect();

    let solve_time_s = started.elapsed().as_secs_f64();
    tracing::info!(
        case = compiled.id.as_str(),
        steps = steps.len(),
        solve_time_s,
        "case finished"
    );
    Ok(CaseReport {
        case_id: compiled.id,
        name: compiled.name,
        instances: compiled.batch.len(),
        steps,
        outputs,
        solve_time_s,
    })
}

pub fn run_case(project: &Project, case_id: &str) -> AppResult<CaseReport> {
    let case = project_service::get_case(project, case_id)?;
    run_compiled(compile_case(project, case)?)
}

pub fn run_all(project: &Project) -> AppResult<Vec<CaseReport>> {
    project
        .cases
        .iter()
        .map(|case| run_compiled(compile_case(project, case)?))
        .collect()
}

/// Load, validate and run one case, or all cases when `case_id` is `None`.
pub fn run_project(path: &Path, case_id: Option<&str>) -> AppResult<Vec<CaseReport>> {
    let project = project_service::load_project(path)?;
    match case_id {
        Some(id) => Ok(vec![run_case(&project, id)?]),
        None => run_all(&project),
    }
}

pub fn render_reports(reports: &[CaseReport], format: ReportFormat) -> AppResult<String> {
    Ok(match format {
        ReportFormat::Yaml => serde_yaml::to_string(reports)?,
        ReportFormat::Json => serde_json::to_string_pretty(reports)?,
    })
}

pub fn write_reports(path: &Path, reports: &[CaseReport], format: ReportFormat) -> AppResult<()> {
    let content = render_reports(reports, format)?;
    std::fs::write(path, content).map_err(|e| AppError::ReportWrite {
        path: path.to_path_buf(),
        source: e,
    })
}
