use clap::{Parser, Subcommand};
use hy_app::{AppResult, ReportFormat, project_service, run_service};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hy-cli")]
#[command(about = "HydroFlow CLI - batch pipe, channel and weir hydraulics", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate case file syntax and structure
    Validate {
        /// Path to the case file (YAML or JSON)
        project_path: PathBuf,
    },
    /// List cases in a project
    Cases {
        /// Path to the case file (YAML or JSON)
        project_path: PathBuf,
    },
    /// Run one case or every case
    Run {
        /// Path to the case file (YAML or JSON)
        project_path: PathBuf,
        /// Case ID to run (defaults to all cases)
        #[arg(long)]
        case: Option<String>,
        /// Report format: yaml or json
        #[arg(long, default_value = "yaml")]
        format: ReportFormat,
        /// Output file for the full report (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List pump, circular channel and drip unit records
    Records {
        /// Path to the case file (YAML or JSON)
        project_path: PathBuf,
    },
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { project_path } => cmd_validate(&project_path),
        Commands::Cases { project_path } => cmd_cases(&project_path),
        Commands::Run {
            project_path,
            case,
            format,
            output,
        } => cmd_run(&project_path, case.as_deref(), format, output.as_deref()),
        Commands::Records { project_path } => cmd_records(&project_path),
    }
}

fn cmd_validate(project_path: &Path) -> AppResult<()> {
    println!("Validating project: {}", project_path.display());
    let project = project_service::load_project(project_path)?;
    project_service::validate_project(&project)?;
    println!("✓ Project is valid");
    Ok(())
}

fn cmd_cases(project_path: &Path) -> AppResult<()> {
    let project = project_service::load_project(project_path)?;
    let cases = project_service::list_cases(&project);

    if cases.is_empty() {
        println!("No cases found in project");
    } else {
        println!("Cases in project:");
        for case in cases {
            println!(
                "  {} - {} ({} instances: {})",
                case.id,
                case.name,
                case.instances,
                case.operations.join(" -> ")
            );
        }
    }
    Ok(())
}

fn cmd_run(
    project_path: &Path,
    case_id: Option<&str>,
    format: ReportFormat,
    output: Option<&Path>,
) -> AppResult<()> {
    let reports = run_service::run_project(project_path, case_id)?;

    match output {
        Some(path) => {
            for report in &reports {
                println!(
                    "✓ {} ({} instances, {:.3} ms)",
                    report.case_id,
                    report.instances,
                    report.solve_time_s * 1e3
                );
                for step in &report.steps {
                    println!("    {:<28} {:>4} iterations", step.operation, step.iterations);
                }
            }
            run_service::write_reports(path, &reports, format)?;
            println!("Report written to {}", path.display());
        }
        None => print!("{}", run_service::render_reports(&reports, format)?),
    }
    Ok(())
}

fn cmd_records(project_path: &Path) -> AppResult<()> {
    let project = project_service::load_project(project_path)?;
    let records = project_service::list_records(&project)?;

    if records.is_empty() {
        println!("No records found in project");
    } else {
        for record in records {
            println!(
                "  [{}] {} - {}: {}",
                record.kind, record.id, record.name, record.detail
            );
        }
    }
    Ok(())
}
