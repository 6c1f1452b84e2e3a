pub mod app_config;
pub mod competitors;
pub mod config;
pub mod fallback;
pub mod types;

use thiserror::Error;

pub use app_config::{
    redact_userinfo, AppConfig, DashboardConfig, Environment, ExportFormat, FailurePolicy,
    ReportRoute,
};
pub use competitors::{normalize_website, AddOutcome, CompetitorSet, MAX_COMPETITORS};
pub use config::{load_app_config, load_app_config_from_env};
pub use fallback::{generate_fallback, industry_profile, FallbackResult, IndustryProfile};
pub use types::{
    build_payload, parse_competitor_line, parse_name_list, validate_request, AnalysisRequest,
    BrandDescriptor, CompetitorDescriptor, FormInput,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("brand name must be non-empty")]
    EmptyBrandName,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
