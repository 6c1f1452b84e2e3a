use super::*;
use std::path::Path;

use signal_scale_core::{AppConfig, CompetitorDescriptor, Environment, FailurePolicy};

fn app_config() -> AppConfig {
    AppConfig {
        env: Environment::Test,
        bind_addr: "127.0.0.1:3000".parse().expect("addr"),
        backend_url: "http://localhost:8000".to_string(),
        static_dir: PathBuf::from("./dist"),
        log_level: "info".to_string(),
        api_base: "https://signal-scale.onrender.com".to_string(),
        failure_policy: FailurePolicy::Surface,
        export_format: ExportFormat::Csv,
        report_route: ReportRoute::Report,
        request_timeout_secs: None,
        proxy_max_body_bytes: 1024,
        user_agent: "signal-scale-test/0.1".to_string(),
    }
}

#[test]
fn parses_analyze_with_brand_and_competitors() {
    let cli = Cli::try_parse_from([
        "signal-scale",
        "analyze",
        "--brand",
        "Acme",
        "--url",
        "acme.com",
        "--competitor",
        "Ed Hardy | https://edhardyoriginals.com",
        "--competitor",
        "Von Dutch",
    ])
    .expect("expected valid cli args");

    let Commands::Analyze { brand, api } = cli.command else {
        panic!("expected analyze command");
    };
    assert_eq!(brand.brand.as_deref(), Some("Acme"));
    assert_eq!(brand.competitors.len(), 2);
    assert!(!api.fallback);
    assert!(!api.strict);
    assert!(api.api_base.is_none());
}

#[test]
fn parses_agents_with_fallback_and_strict() {
    let cli = Cli::try_parse_from([
        "signal-scale",
        "agents",
        "--brand",
        "Acme",
        "--fallback",
        "--strict",
        "--api-base",
        "http://localhost:8000",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Agents {
            api: ApiArgs {
                fallback: true,
                strict: true,
                api_base: Some(ref base),
            },
            ..
        } if base == "http://localhost:8000"
    ));
}

#[test]
fn parses_export_format_aliases() {
    let cli = Cli::try_parse_from(["signal-scale", "export", "--brand", "Acme", "--format", "md"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::Export {
            format: Some(ExportFormat::Markdown),
            ..
        }
    ));
}

#[test]
fn export_defaults_to_current_directory() {
    let cli =
        Cli::try_parse_from(["signal-scale", "export", "--brand", "Acme"]).expect("valid args");
    let Commands::Export {
        format, out_dir, ..
    } = cli.command
    else {
        panic!("expected export command");
    };
    assert!(format.is_none());
    assert_eq!(out_dir, PathBuf::from("."));
}

#[test]
fn rejects_unknown_export_format() {
    assert!(
        Cli::try_parse_from(["signal-scale", "export", "--format", "docx"]).is_err(),
        "docx is not an export format"
    );
}

#[test]
fn parses_fallback_command() {
    let cli = Cli::try_parse_from([
        "signal-scale",
        "fallback",
        "--brand",
        "Acme",
        "--industry",
        "Technology",
        "--competitors",
        "3",
    ])
    .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::Fallback {
            brand: Some(ref b),
            industry: Some(ref i),
            competitors: 3,
        } if b == "Acme" && i == "Technology"
    ));
}

#[test]
fn offline_commands_do_not_need_config() {
    let payload = Cli::try_parse_from(["signal-scale", "payload", "--brand", "Acme"])
        .expect("valid args");
    assert!(!payload.command.needs_config());

    let fallback = Cli::try_parse_from(["signal-scale", "fallback"]).expect("valid args");
    assert!(!fallback.command.needs_config());

    for sub in ["analyze", "agents", "export"] {
        let cli = Cli::try_parse_from(["signal-scale", sub]).expect("valid args");
        assert!(cli.command.needs_config(), "{sub} calls the API");
    }
}

#[test]
fn help_is_rendered_before_any_config_is_read() {
    let err = Cli::try_parse_from(["signal-scale", "--help"]).expect_err("help exits early");
    assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
}

#[test]
fn parses_export_report_route() {
    let cli = Cli::try_parse_from([
        "signal-scale",
        "export",
        "--format",
        "pdf",
        "--report-route",
        "export",
    ])
    .expect("expected valid cli args");
    let Commands::Export { report_route, .. } = cli.command else {
        panic!("expected export command");
    };
    assert_eq!(report_route, Some(ReportRoute::Export));

    assert!(
        Cli::try_parse_from(["signal-scale", "export", "--report-route", "query"]).is_err(),
        "query is not a report route"
    );
}

#[test]
fn dashboard_applies_command_line_overrides() {
    let api = ApiArgs {
        api_base: Some("http://localhost:9000".to_string()),
        fallback: true,
        strict: false,
    };
    let dashboard = commands::dashboard(
        &app_config(),
        &api,
        Some(ExportFormat::Pdf),
        Some(ReportRoute::Export),
    )
    .expect("dashboard");

    let settings = dashboard.config();
    assert_eq!(settings.api_base, "http://localhost:9000");
    assert_eq!(settings.failure_policy, FailurePolicy::Fallback);
    assert_eq!(settings.export_format, ExportFormat::Pdf);
    assert_eq!(settings.report_route, ReportRoute::Export);
    assert!(!settings.strict);
}

#[test]
fn subcommand_is_required() {
    assert!(Cli::try_parse_from(["signal-scale"]).is_err());
}

#[test]
fn brand_args_build_payload_from_competitor_lines() {
    let args = BrandArgs {
        brand: Some("Acme".to_string()),
        url: Some("acme.com".to_string()),
        competitors: vec![
            "Ed Hardy | edhardyoriginals.com".to_string(),
            "Von Dutch".to_string(),
        ],
        questions: vec!["pricing, positioning".to_string()],
        ..BrandArgs::default()
    };

    let request = args.request().expect("request");

    assert_eq!(request.brand.name.as_deref(), Some("Acme"));
    assert_eq!(request.brand.website.as_deref(), Some("acme.com"));
    assert_eq!(
        request.competitors,
        vec![
            CompetitorDescriptor {
                name: Some("Ed Hardy".to_string()),
                website: Some("https://edhardyoriginals.com".to_string()),
            },
            CompetitorDescriptor {
                name: Some("Von Dutch".to_string()),
                website: None,
            },
        ]
    );
    assert_eq!(
        request.questions,
        Some(vec!["pricing".to_string(), "positioning".to_string()])
    );
}

#[test]
fn brand_args_drop_duplicate_and_excess_competitors() {
    let mut competitors: Vec<String> = (0..12).map(|i| format!("Rival {i}")).collect();
    competitors.insert(1, "rival 0".to_string());
    let args = BrandArgs {
        brand: Some("Acme".to_string()),
        competitors,
        ..BrandArgs::default()
    };

    let request = args.request().expect("request");

    assert_eq!(request.competitors.len(), signal_scale_core::MAX_COMPETITORS);
    assert_eq!(request.competitors[1].name.as_deref(), Some("Rival 1"));
}

#[test]
fn brand_args_keep_competitors_given_only_by_website() {
    let args = BrandArgs {
        brand: Some("Acme".to_string()),
        competitors: vec![
            "Ed Hardy".to_string(),
            " | x.com".to_string(),
            "ed hardy".to_string(),
            " | ".to_string(),
        ],
        ..BrandArgs::default()
    };

    let request = args.request().expect("request");

    assert_eq!(request.competitors.len(), 2);
    assert_eq!(request.competitors[0].name.as_deref(), Some("Ed Hardy"));
    assert_eq!(request.competitors[1].name, None);
    assert_eq!(
        request.competitors[1].website.as_deref(),
        Some("https://x.com")
    );
}

#[test]
fn brand_args_read_competitors_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let file = dir.path().join("competitors.txt");
    std::fs::write(&file, "Ed Hardy | edhardyoriginals.com\n\nVon Dutch\n").expect("write");

    let args = BrandArgs {
        brand: Some("Acme".to_string()),
        competitors: vec!["Christian Audigier".to_string()],
        competitors_file: Some(file),
        ..BrandArgs::default()
    };

    let names: Vec<_> = args
        .request()
        .expect("request")
        .competitors
        .into_iter()
        .filter_map(|c| c.name)
        .collect();
    assert_eq!(names, ["Christian Audigier", "Ed Hardy", "Von Dutch"]);
}

#[test]
fn missing_competitors_file_is_an_error() {
    let args = BrandArgs {
        competitors_file: Some(PathBuf::from("/nonexistent/competitors.txt")),
        ..BrandArgs::default()
    };
    let err = args.request().expect_err("missing file");
    assert!(err.to_string().contains("/nonexistent/competitors.txt"));
}

#[test]
fn export_path_joins_out_dir() {
    assert_eq!(
        commands::export_path(Path::new("/tmp/out"), "acme.pdf"),
        PathBuf::from("/tmp/out/acme.pdf")
    );
}
