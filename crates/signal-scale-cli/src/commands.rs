//! Command handlers. Results go to stdout; progress and diagnostics go to
//! stderr through `tracing` and the agent status lines.

use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::Context;
use serde_json::Value;
use signal_scale_client::{AgentBoard, AnalysisOutcome, Dashboard, DEFAULT_PACING_DELAY};
use signal_scale_core::{
    generate_fallback, AppConfig, BrandDescriptor, ExportFormat, FailurePolicy, ReportRoute,
};

use crate::{brand::BrandArgs, ApiArgs};

/// Builds a dashboard from the environment configuration with command-line
/// overrides applied.
pub(crate) fn dashboard(
    config: &AppConfig,
    api: &ApiArgs,
    format: Option<ExportFormat>,
    report_route: Option<ReportRoute>,
) -> anyhow::Result<Dashboard> {
    let mut settings = config.dashboard_config().with_strict(api.strict);
    if let Some(base) = &api.api_base {
        settings.api_base.clone_from(base);
    }
    if api.fallback {
        settings = settings.with_failure_policy(FailurePolicy::Fallback);
    }
    if let Some(format) = format {
        settings = settings.with_export_format(format);
    }
    if let Some(route) = report_route {
        settings = settings.with_report_route(route);
    }
    Ok(Dashboard::new(settings)?)
}

fn exit_code(outcome: &AnalysisOutcome) -> ExitCode {
    if outcome.is_failed() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn print_outcome(outcome: &AnalysisOutcome) {
    if outcome.is_failed() {
        eprintln!("{}", outcome.render());
    } else {
        println!("{}", outcome.render());
    }
}

pub(crate) async fn run_analyze(
    dashboard: &Dashboard,
    brand: &BrandArgs,
) -> anyhow::Result<ExitCode> {
    let request = brand.request()?;
    tracing::info!(
        brand = request.brand.display_name(),
        competitors = request.competitors.len(),
        "running analysis"
    );
    let outcome = dashboard.run_analysis(&request).await;
    print_outcome(&outcome);
    Ok(exit_code(&outcome))
}

pub(crate) async fn run_agents(
    dashboard: &Dashboard,
    brand: &BrandArgs,
) -> anyhow::Result<ExitCode> {
    let request = brand.request()?;

    let mut board = AgentBoard::start(DEFAULT_PACING_DELAY);
    let mut phases = board.subscribe();
    print_status(&board);

    let run = dashboard.run_agents(&request);
    tokio::pin!(run);
    let outcome = loop {
        tokio::select! {
            outcome = &mut run => break outcome,
            Ok(()) = phases.changed() => {
                phases.borrow_and_update();
                print_status(&board);
            }
        }
    };

    board.complete();
    print_status(&board);
    print_outcome(&outcome);
    Ok(exit_code(&outcome))
}

fn print_status(board: &AgentBoard) {
    for line in board.status_lines() {
        eprintln!("{line}");
    }
}

pub(crate) async fn run_export(
    dashboard: &Dashboard,
    brand: &BrandArgs,
    analysis_file: Option<&Path>,
    out_dir: &Path,
) -> anyhow::Result<ExitCode> {
    let request = brand.request()?;
    let format = dashboard.config().export_format;

    let analysis_data = match (analysis_file, format) {
        (Some(path), _) => Some(read_analysis(path)?),
        (None, ExportFormat::Csv) => None,
        (None, _) => {
            let outcome = dashboard.run_analysis(&request).await;
            match analysis_value(&outcome)? {
                Some(value) => Some(value),
                None => {
                    print_outcome(&outcome);
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
    };

    let (download, filename) = dashboard.export(&request, analysis_data.as_ref()).await?;
    let path = export_path(out_dir, &filename);
    tokio::fs::write(&path, &download.bytes)
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;

    println!("{}", path.display());
    Ok(ExitCode::SUCCESS)
}

fn read_analysis(path: &Path) -> anyhow::Result<Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("{} is not valid JSON", path.display()))
}

/// The data a report should embed, or `None` when the analysis failed.
fn analysis_value(outcome: &AnalysisOutcome) -> anyhow::Result<Option<Value>> {
    Ok(match outcome {
        AnalysisOutcome::Live(value) => Some(value.clone()),
        AnalysisOutcome::Fallback(result) => Some(serde_json::to_value(result)?),
        AnalysisOutcome::Failed(_) => None,
    })
}

pub(crate) fn run_fallback(
    brand: Option<String>,
    industry: Option<String>,
    competitors: usize,
) -> anyhow::Result<ExitCode> {
    let descriptor = BrandDescriptor {
        name: brand,
        industry,
        ..BrandDescriptor::default()
    };
    let result = generate_fallback(&descriptor, competitors);
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(ExitCode::SUCCESS)
}

pub(crate) fn run_payload(brand: &BrandArgs) -> anyhow::Result<ExitCode> {
    let request = brand.request()?;
    println!("{}", serde_json::to_string_pretty(&request)?);
    Ok(ExitCode::SUCCESS)
}

/// Where `export` writes a download. Server-supplied names are already
/// reduced to a bare file name.
#[must_use]
pub(crate) fn export_path(out_dir: &Path, filename: &str) -> PathBuf {
    out_dir.join(filename)
}
