//! Dashboard session: runs an analysis and turns every result, error or
//! placeholder into something displayable.

use chrono::Utc;
use serde_json::Value;
use signal_scale_core::{
    generate_fallback, validate_request, AnalysisRequest, DashboardConfig, ExportFormat,
    FailurePolicy, FallbackResult, ReportRoute,
};

use crate::client::{IntelligenceClient, ReportRequest};
use crate::download::{default_report_filename, Download, CSV_EXPORT_FILENAME};
use crate::error::ApiError;

/// Prefix on every user-visible failure message.
pub const FAILURE_INDICATOR: &str = "❌";

/// What the dashboard shows after an analysis attempt.
#[derive(Debug, Clone)]
pub enum AnalysisOutcome {
    /// Data returned by the backend.
    Live(Value),
    /// Generated placeholder used because the backend call failed.
    Fallback(FallbackResult),
    /// Error message, already prefixed with [`FAILURE_INDICATOR`].
    Failed(String),
}

impl AnalysisOutcome {
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        matches!(self, AnalysisOutcome::Fallback(_))
    }

    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, AnalysisOutcome::Failed(_))
    }

    /// Text for the result panel.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            AnalysisOutcome::Live(value) => {
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            }
            AnalysisOutcome::Fallback(result) => serde_json::to_string_pretty(result)
                .unwrap_or_else(|e| format!("{FAILURE_INDICATOR} {e}")),
            AnalysisOutcome::Failed(message) => message.clone(),
        }
    }
}

/// Unwraps a `{success, data}` envelope; other shapes are shown whole.
fn unwrap_envelope(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.get("data").is_some_and(Value::is_object) => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

fn failure_message(err: &ApiError) -> String {
    format!("{FAILURE_INDICATOR} {err}")
}

/// One configured dashboard.
#[derive(Debug, Clone)]
pub struct Dashboard {
    client: IntelligenceClient,
    config: DashboardConfig,
}

impl Dashboard {
    /// Builds a dashboard and its client from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidBaseUrl`] or [`ApiError::Transport`] when
    /// the client cannot be constructed.
    pub fn new(config: DashboardConfig) -> Result<Self, ApiError> {
        let client =
            IntelligenceClient::new(&config.api_base, config.request_timeout, &config.user_agent)?;
        Ok(Self { client, config })
    }

    #[must_use]
    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    #[must_use]
    pub fn client(&self) -> &IntelligenceClient {
        &self.client
    }

    fn check(&self, request: &AnalysisRequest) -> Result<(), ApiError> {
        if self.config.strict {
            validate_request(request)?;
        }
        Ok(())
    }

    fn on_failure(&self, request: &AnalysisRequest, err: &ApiError) -> AnalysisOutcome {
        match (self.config.failure_policy, err) {
            (_, ApiError::Validation(_)) | (FailurePolicy::Surface, _) => {
                tracing::error!(error = %err, "analysis failed");
                AnalysisOutcome::Failed(failure_message(err))
            }
            (FailurePolicy::Fallback, _) => {
                tracing::warn!(error = %err, "analysis failed; showing fallback data");
                AnalysisOutcome::Fallback(generate_fallback(
                    &request.brand,
                    request.competitors.len(),
                ))
            }
        }
    }

    /// Runs the combined analysis. Never fails: errors become
    /// [`AnalysisOutcome::Failed`] or [`AnalysisOutcome::Fallback`] according
    /// to the failure policy. Validation errors are always surfaced.
    pub async fn run_analysis(&self, request: &AnalysisRequest) -> AnalysisOutcome {
        let result = match self.check(request) {
            Ok(()) => self.client.analyze(request).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(value) => AnalysisOutcome::Live(unwrap_envelope(value)),
            Err(err) => self.on_failure(request, &err),
        }
    }

    /// Runs the three agents and merges their output under the same policy.
    pub async fn run_agents(&self, request: &AnalysisRequest) -> AnalysisOutcome {
        let result = match self.check(request) {
            Ok(()) => self.client.run_agents(request).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(agents) => match serde_json::to_value(&agents) {
                Ok(value) => AnalysisOutcome::Live(value),
                Err(e) => AnalysisOutcome::Failed(format!("{FAILURE_INDICATOR} {e}")),
            },
            Err(err) => self.on_failure(request, &err),
        }
    }

    /// Exports in the configured format and returns the bytes with the
    /// filename to save them under.
    ///
    /// CSV goes through `/api/intelligence/export`. PDF and markdown carry
    /// `analysis_data` and go through `/api/export/report`, or `/api/export`
    /// when the configured report route is [`ReportRoute::Export`].
    ///
    /// # Errors
    ///
    /// Returns the client error; export failures never fall back.
    pub async fn export(
        &self,
        request: &AnalysisRequest,
        analysis_data: Option<&Value>,
    ) -> Result<(Download, String), ApiError> {
        self.check(request)?;
        let format = self.config.export_format;
        let (download, default_name) = match format {
            ExportFormat::Csv => (
                self.client.export_csv(request).await?,
                CSV_EXPORT_FILENAME.to_owned(),
            ),
            ExportFormat::Pdf | ExportFormat::Markdown => {
                let report = ReportRequest::new(
                    request,
                    analysis_data.cloned().unwrap_or(Value::Null),
                    format,
                );
                let download = match self.config.report_route {
                    ReportRoute::Report => self.client.export_report(&report, format).await?,
                    ReportRoute::Export => self.client.export_analysis(&report).await?,
                };
                let name = default_report_filename(
                    request.brand.display_name(),
                    format,
                    Utc::now().date_naive(),
                );
                (download, name)
            }
        };
        let filename = download.filename_or(&default_name);
        tracing::info!(%format, filename, bytes = download.bytes.len(), "export downloaded");
        Ok((download, filename))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_data_is_unwrapped() {
        let value = serde_json::json!({"success": true, "data": {"kpis": {"brand_score": 90}}});
        assert_eq!(
            unwrap_envelope(value),
            serde_json::json!({"kpis": {"brand_score": 90}})
        );
    }

    #[test]
    fn non_object_data_is_left_alone() {
        let value = serde_json::json!({"success": true, "data": [1, 2]});
        assert_eq!(unwrap_envelope(value.clone()), value);

        let plain = serde_json::json!({"cultural_radar": {}});
        assert_eq!(unwrap_envelope(plain.clone()), plain);
    }

    #[test]
    fn failed_outcome_renders_message_verbatim() {
        let outcome = AnalysisOutcome::Failed("❌ API 500 Internal Server Error: boom".to_string());
        assert!(outcome.is_failed());
        assert_eq!(outcome.render(), "❌ API 500 Internal Server Error: boom");
    }

    #[test]
    fn fallback_outcome_renders_tagged_json() {
        let brand = signal_scale_core::BrandDescriptor::named("Acme");
        let outcome = AnalysisOutcome::Fallback(generate_fallback(&brand, 1));
        assert!(outcome.is_fallback());
        let rendered: Value = serde_json::from_str(&outcome.render()).unwrap();
        assert_eq!(rendered["source"], "fallback");
    }
}
