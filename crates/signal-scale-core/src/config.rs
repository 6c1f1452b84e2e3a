use crate::app_config::{AppConfig, Environment, ExportFormat, FailurePolicy, ReportRoute};
use crate::ConfigError;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";
pub const DEFAULT_API_BASE: &str = "https://signal-scale.onrender.com";
pub const DEFAULT_USER_AGENT: &str = "signal-scale/0.1 (competitive-intelligence)";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::{IpAddr, SocketAddr};
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let env = parse_environment(&or_default("SIGNAL_SCALE_ENV", "development"))?;

    let port = or_default("PORT", "3000")
        .trim()
        .parse::<u16>()
        .map_err(|e| invalid("PORT", e.to_string()))?;
    let host = or_default("SIGNAL_SCALE_BIND_HOST", "0.0.0.0")
        .trim()
        .parse::<IpAddr>()
        .map_err(|e| invalid("SIGNAL_SCALE_BIND_HOST", e.to_string()))?;
    let bind_addr = SocketAddr::new(host, port);

    let backend_url = or_default("BACKEND_URL", DEFAULT_BACKEND_URL);
    if !backend_url.starts_with("http://") && !backend_url.starts_with("https://") {
        return Err(invalid(
            "BACKEND_URL",
            format!("'{backend_url}' must start with http:// or https://"),
        ));
    }

    let static_dir = PathBuf::from(or_default("SIGNAL_SCALE_STATIC_DIR", "./dist"));
    let log_level = or_default("SIGNAL_SCALE_LOG_LEVEL", "info");
    let api_base = or_default("SIGNAL_SCALE_API_BASE", DEFAULT_API_BASE);

    let failure_policy = parse_failure_policy(&or_default("SIGNAL_SCALE_FAILURE_POLICY", "surface"))?;

    let export_format = or_default("SIGNAL_SCALE_EXPORT_FORMAT", "csv")
        .parse::<ExportFormat>()
        .map_err(|reason| invalid("SIGNAL_SCALE_EXPORT_FORMAT", reason))?;

    let report_route = or_default("SIGNAL_SCALE_REPORT_ROUTE", "report")
        .parse::<ReportRoute>()
        .map_err(|reason| invalid("SIGNAL_SCALE_REPORT_ROUTE", reason))?;

    let request_timeout_secs = match lookup("SIGNAL_SCALE_REQUEST_TIMEOUT_SECS") {
        Ok(raw) => Some(
            raw.trim()
                .parse::<u64>()
                .map_err(|e| invalid("SIGNAL_SCALE_REQUEST_TIMEOUT_SECS", e.to_string()))?,
        ),
        Err(_) => None,
    };

    let proxy_max_body_bytes = or_default("SIGNAL_SCALE_PROXY_MAX_BODY_BYTES", "10485760")
        .trim()
        .parse::<usize>()
        .map_err(|e| invalid("SIGNAL_SCALE_PROXY_MAX_BODY_BYTES", e.to_string()))?;

    let user_agent = or_default("SIGNAL_SCALE_USER_AGENT", DEFAULT_USER_AGENT);

    Ok(AppConfig {
        env,
        bind_addr,
        backend_url,
        static_dir,
        log_level,
        api_base,
        failure_policy,
        export_format,
        report_route,
        request_timeout_secs,
        proxy_max_body_bytes,
        user_agent,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s.trim() {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "SIGNAL_SCALE_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

fn parse_failure_policy(s: &str) -> Result<FailurePolicy, ConfigError> {
    match s.trim().to_lowercase().as_str() {
        "surface" => Ok(FailurePolicy::Surface),
        "fallback" => Ok(FailurePolicy::Fallback),
        other => Err(ConfigError::InvalidEnvVar {
            var: "SIGNAL_SCALE_FAILURE_POLICY".to_string(),
            reason: format!("expected 'surface' or 'fallback', got '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
