//! Shared application service layer for hydroflow.
//!
//! Loads case files, compiles cases into problem batches, runs their
//! operations and collects serializable reports for the CLI.

pub mod case_compile;
pub mod error;
pub mod project_service;
pub mod run_service;

// Re-export key types for convenience
pub use case_compile::{CompiledCase, build_settings, compile_case};
pub use error::{AppError, AppResult};
pub use project_service::{
    CaseSummary, RecordSummary, get_case, list_cases, list_records, load_project, save_project,
    validate_project,
};
pub use run_service::{
    CaseReport, ReportFormat, StepReport, render_reports, run_all, run_case, run_compiled,
    run_project, write_reports,
};
