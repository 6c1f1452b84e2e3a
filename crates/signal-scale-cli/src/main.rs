mod brand;
mod commands;

use std::{path::PathBuf, process::ExitCode};

use clap::{Args, Parser, Subcommand};
use signal_scale_core::{AppConfig, ExportFormat, ReportRoute};
use tracing_subscriber::EnvFilter;

use crate::brand::BrandArgs;

#[derive(Debug, Parser)]
#[command(name = "signal-scale")]
#[command(about = "Signal & Scale competitive intelligence command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Options controlling how the intelligence API is reached.
#[derive(Debug, Clone, Default, Args)]
struct ApiArgs {
    /// API origin, overrides `SIGNAL_SCALE_API_BASE`
    #[arg(long)]
    api_base: Option<String>,
    /// Show deterministic placeholder data when the API call fails
    #[arg(long)]
    fallback: bool,
    /// Reject requests without a brand name before calling the API
    #[arg(long)]
    strict: bool,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the combined intelligence analysis
    Analyze {
        #[command(flatten)]
        brand: BrandArgs,
        #[command(flatten)]
        api: ApiArgs,
    },
    /// Run the cultural radar, competitive playbook and DTC audit agents
    Agents {
        #[command(flatten)]
        brand: BrandArgs,
        #[command(flatten)]
        api: ApiArgs,
    },
    /// Download an analysis export
    Export {
        #[command(flatten)]
        brand: BrandArgs,
        #[command(flatten)]
        api: ApiArgs,
        /// Export format: csv, pdf or markdown
        #[arg(long, value_parser = parse_export_format)]
        format: Option<ExportFormat>,
        /// Report endpoint for pdf and markdown: report or export
        #[arg(long, value_parser = parse_report_route)]
        report_route: Option<ReportRoute>,
        /// Analysis JSON to embed in a report; runs an analysis when omitted
        #[arg(long)]
        analysis_file: Option<PathBuf>,
        /// Directory to write the export into
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
    /// Print placeholder results without calling the API
    Fallback {
        #[arg(long)]
        brand: Option<String>,
        #[arg(long)]
        industry: Option<String>,
        /// Number of tracked competitors to report
        #[arg(long, default_value = "0")]
        competitors: usize,
    },
    /// Print the request payload that would be sent
    Payload {
        #[command(flatten)]
        brand: BrandArgs,
    },
}

fn parse_export_format(s: &str) -> Result<ExportFormat, String> {
    s.parse()
}

fn parse_report_route(s: &str) -> Result<ReportRoute, String> {
    s.parse()
}

impl Commands {
    /// Whether the command talks to the API and so needs the environment
    /// configuration.
    fn needs_config(&self) -> bool {
        matches!(
            self,
            Commands::Analyze { .. } | Commands::Agents { .. } | Commands::Export { .. }
        )
    }
}

/// Log filter from `RUST_LOG`, then `SIGNAL_SCALE_LOG_LEVEL`, then `info`.
fn env_filter(config: Option<&AppConfig>) -> anyhow::Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    let level = config.map_or_else(
        || std::env::var("SIGNAL_SCALE_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        |config| config.log_level.clone(),
    );
    Ok(EnvFilter::try_new(level)?)
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    // Server-only settings must not break offline commands.
    let config = if cli.command.needs_config() {
        Some(signal_scale_core::load_app_config()?)
    } else {
        None
    };
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(config.as_ref())?)
        .with_writer(std::io::stderr)
        .init();

    match (cli.command, config) {
        (Commands::Analyze { brand, api }, Some(config)) => {
            let dashboard = commands::dashboard(&config, &api, None, None)?;
            commands::run_analyze(&dashboard, &brand).await
        }
        (Commands::Agents { brand, api }, Some(config)) => {
            let dashboard = commands::dashboard(&config, &api, None, None)?;
            commands::run_agents(&dashboard, &brand).await
        }
        (
            Commands::Export {
                brand,
                api,
                format,
                report_route,
                analysis_file,
                out_dir,
            },
            Some(config),
        ) => {
            let dashboard = commands::dashboard(&config, &api, format, report_route)?;
            commands::run_export(&dashboard, &brand, analysis_file.as_deref(), &out_dir).await
        }
        (
            Commands::Fallback {
                brand,
                industry,
                competitors,
            },
            _,
        ) => commands::run_fallback(brand, industry, competitors),
        (Commands::Payload { brand }, _) => commands::run_payload(&brand),
        (command, None) => anyhow::bail!("configuration was not loaded for {command:?}"),
    }
}

#[cfg(test)]
mod tests;
