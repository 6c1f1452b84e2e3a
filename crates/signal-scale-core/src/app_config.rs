use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// What the dashboard does when a backend call fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Show the error to the user.
    Surface,
    /// Replace the result with generated placeholder data.
    Fallback,
}

impl std::fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailurePolicy::Surface => write!(f, "surface"),
            FailurePolicy::Fallback => write!(f, "fallback"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Pdf,
    Markdown,
}

impl ExportFormat {
    /// Value of the `format` query parameter.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Markdown => "markdown",
        }
    }

    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Markdown => "md",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "pdf" => Ok(ExportFormat::Pdf),
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            other => Err(format!("unknown export format '{other}'")),
        }
    }
}

/// Endpoint used for PDF and markdown reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportRoute {
    /// `POST /api/export/report?format=`, format in the query string.
    Report,
    /// `POST /api/export`, format in the request body.
    Export,
}

impl std::fmt::Display for ReportRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportRoute::Report => write!(f, "report"),
            ReportRoute::Export => write!(f, "export"),
        }
    }
}

impl std::str::FromStr for ReportRoute {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "report" => Ok(ReportRoute::Report),
            "export" => Ok(ReportRoute::Export),
            other => Err(format!("expected 'report' or 'export', got '{other}'")),
        }
    }
}

/// Settings for one dashboard session, injected at construction time.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub api_base: String,
    pub failure_policy: FailurePolicy,
    pub export_format: ExportFormat,
    pub report_route: ReportRoute,
    /// Reject requests with an empty brand name before sending.
    pub strict: bool,
    pub request_timeout: Option<Duration>,
    pub user_agent: String,
}

impl DashboardConfig {
    #[must_use]
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
            failure_policy: FailurePolicy::Surface,
            export_format: ExportFormat::Csv,
            report_route: ReportRoute::Report,
            strict: true,
            request_timeout: None,
            user_agent: crate::config::DEFAULT_USER_AGENT.to_owned(),
        }
    }

    #[must_use]
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    #[must_use]
    pub fn with_export_format(mut self, format: ExportFormat) -> Self {
        self.export_format = format;
        self
    }

    #[must_use]
    pub fn with_report_route(mut self, route: ReportRoute) -> Self {
        self.report_route = route;
        self
    }

    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub backend_url: String,
    pub static_dir: PathBuf,
    pub log_level: String,
    pub api_base: String,
    pub failure_policy: FailurePolicy,
    pub export_format: ExportFormat,
    pub report_route: ReportRoute,
    pub request_timeout_secs: Option<u64>,
    pub proxy_max_body_bytes: usize,
    pub user_agent: String,
}

impl AppConfig {
    /// Dashboard settings derived from this configuration.
    #[must_use]
    pub fn dashboard_config(&self) -> DashboardConfig {
        DashboardConfig {
            api_base: self.api_base.clone(),
            failure_policy: self.failure_policy,
            export_format: self.export_format,
            report_route: self.report_route,
            strict: true,
            request_timeout: self.request_timeout_secs.map(Duration::from_secs),
            user_agent: self.user_agent.clone(),
        }
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("backend_url", &redact_userinfo(&self.backend_url))
            .field("static_dir", &self.static_dir)
            .field("log_level", &self.log_level)
            .field("api_base", &self.api_base)
            .field("failure_policy", &self.failure_policy)
            .field("export_format", &self.export_format)
            .field("report_route", &self.report_route)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("proxy_max_body_bytes", &self.proxy_max_body_bytes)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// Hides `user:pass@` credentials embedded in a URL.
#[must_use]
pub fn redact_userinfo(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_owned();
    };
    let authority_end = rest.find('/').unwrap_or(rest.len());
    match rest[..authority_end].rsplit_once('@') {
        Some((_, host)) => format!("{scheme}://[redacted]@{host}{}", &rest[authority_end..]),
        None => url.to_owned(),
    }
}
