//! HTTP client for the Signal & Scale intelligence backend.
//!
//! Every call is a JSON `POST`. Response bodies are read as text before any
//! JSON parsing, non-2xx statuses become [`ApiError::Status`] with the
//! best-effort decoded body, and nothing is retried.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::{header, Client, Response, Url};
use serde::Serialize;
use serde_json::Value;
use signal_scale_core::{AnalysisRequest, BrandDescriptor, CompetitorDescriptor, ExportFormat};

use crate::body::{decode_error, decode_success};
use crate::download::{filename_from_content_disposition, Download};
use crate::error::ApiError;

pub const ANALYZE_PATH: &str = "/api/intelligence/analyze";
pub const EXPORT_CSV_PATH: &str = "/api/intelligence/export";
pub const EXPORT_PATH: &str = "/api/export";
pub const EXPORT_REPORT_PATH: &str = "/api/export/report";
pub const CULTURAL_RADAR_PATH: &str = "/api/run/cultural_radar";
pub const COMPETITIVE_PLAYBOOK_PATH: &str = "/api/run/competitive_playbook";
pub const DTC_AUDIT_PATH: &str = "/api/run/dtc_audit";

/// Merged output of the three analysis agents.
#[derive(Debug, Clone, Serialize)]
pub struct AgentResults {
    pub cultural_radar: Value,
    pub competitive_playbook: Value,
    pub dtc_audit: Value,
    pub timestamp: DateTime<Utc>,
}

/// Body of a report export request.
#[derive(Debug, Clone, Serialize)]
pub struct ReportRequest {
    pub brand: BrandDescriptor,
    pub competitors: Vec<CompetitorDescriptor>,
    pub analysis_data: Value,
    pub format: ExportFormatName,
}

/// Serializes an [`ExportFormat`] as its query-string name.
#[derive(Debug, Clone, Copy)]
pub struct ExportFormatName(pub ExportFormat);

impl Serialize for ExportFormatName {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.0.as_str())
    }
}

impl ReportRequest {
    #[must_use]
    pub fn new(request: &AnalysisRequest, analysis_data: Value, format: ExportFormat) -> Self {
        Self {
            brand: request.brand.clone(),
            competitors: request.competitors.clone(),
            analysis_data,
            format: ExportFormatName(format),
        }
    }
}

/// Client for the analysis backend.
///
/// The API base is injected at construction; point it at a mock server in
/// tests.
#[derive(Debug, Clone)]
pub struct IntelligenceClient {
    client: Client,
    base: String,
}

impl IntelligenceClient {
    /// Creates a client for `api_base`.
    ///
    /// `timeout` of `None` leaves the transport defaults in place.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidBaseUrl`] if `api_base` is not an absolute
    /// URL, or [`ApiError::Transport`] if the `reqwest::Client` cannot be
    /// built.
    pub fn new(
        api_base: &str,
        timeout: Option<Duration>,
        user_agent: &str,
    ) -> Result<Self, ApiError> {
        let base = api_base.trim().trim_end_matches('/').to_owned();
        Url::parse(&base).map_err(|e| ApiError::InvalidBaseUrl {
            base: api_base.to_owned(),
            reason: e.to_string(),
        })?;

        let mut builder = Client::builder().user_agent(user_agent);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base,
        })
    }

    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        let joined = if path.starts_with('/') {
            format!("{}{path}", self.base)
        } else {
            format!("{}/{path}", self.base)
        };
        Url::parse(&joined).map_err(|e| ApiError::InvalidBaseUrl {
            base: joined,
            reason: e.to_string(),
        })
    }

    async fn post<T: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &T,
    ) -> Result<Response, ApiError> {
        let url = self.endpoint(path)?;
        tracing::debug!(%url, "POST");
        let response = self.client.post(url).json(payload).send().await?;
        Ok(response)
    }

    async fn read_text(response: Response) -> String {
        response.text().await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to read response body");
            String::new()
        })
    }

    fn status_error(status: reqwest::StatusCode, raw: &str, try_json: bool) -> ApiError {
        ApiError::Status {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_owned(),
            body: decode_error(raw, try_json),
        }
    }

    /// POSTs `payload` as JSON and returns the decoded JSON response.
    ///
    /// A 2xx response with an empty or non-JSON body returns
    /// `{"ok": true, "notice": "Empty JSON body returned."}`.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Status`] on a non-2xx status, carrying the body as JSON
    ///   when it parses and as raw text otherwise.
    /// - [`ApiError::Transport`] on network failure or timeout.
    pub async fn call_api<T: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &T,
    ) -> Result<Value, ApiError> {
        let response = self.post(path, payload).await?;
        let status = response.status();
        let raw = Self::read_text(response).await;

        if !status.is_success() {
            tracing::warn!(path, status = status.as_u16(), "API call failed");
            return Err(Self::status_error(status, &raw, true));
        }

        Ok(decode_success(&raw))
    }

    /// POSTs `payload` as JSON and returns the raw response bytes.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Status`] on a non-2xx status; the body is kept as text.
    /// - [`ApiError::Transport`] on network failure or timeout.
    pub async fn call_api_binary<T: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &T,
    ) -> Result<Download, ApiError> {
        let response = self.post(path, payload).await?;
        let status = response.status();

        if !status.is_success() {
            tracing::warn!(path, status = status.as_u16(), "binary API call failed");
            let raw = Self::read_text(response).await;
            return Err(Self::status_error(status, &raw, false));
        }

        let header_str = |name: header::HeaderName| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned)
        };
        let content_type = header_str(header::CONTENT_TYPE);
        let filename = header_str(header::CONTENT_DISPOSITION)
            .as_deref()
            .and_then(filename_from_content_disposition);

        let bytes = response.bytes().await?.to_vec();

        Ok(Download {
            bytes,
            content_type,
            filename,
        })
    }

    /// Runs the combined analysis (`POST /api/intelligence/analyze`).
    ///
    /// # Errors
    ///
    /// See [`IntelligenceClient::call_api`].
    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<Value, ApiError> {
        self.call_api(ANALYZE_PATH, request).await
    }

    /// Downloads the CSV export (`POST /api/intelligence/export`).
    ///
    /// # Errors
    ///
    /// See [`IntelligenceClient::call_api_binary`].
    pub async fn export_csv(&self, request: &AnalysisRequest) -> Result<Download, ApiError> {
        self.call_api_binary(EXPORT_CSV_PATH, request).await
    }

    /// Runs the three agents concurrently and merges their results.
    ///
    /// # Errors
    ///
    /// Returns the first error from any agent; see
    /// [`IntelligenceClient::call_api`].
    pub async fn run_agents(&self, request: &AnalysisRequest) -> Result<AgentResults, ApiError> {
        let (cultural_radar, competitive_playbook, dtc_audit) = futures::try_join!(
            self.call_api(CULTURAL_RADAR_PATH, request),
            self.call_api(COMPETITIVE_PLAYBOOK_PATH, request),
            self.call_api(DTC_AUDIT_PATH, request),
        )?;

        Ok(AgentResults {
            cultural_radar,
            competitive_playbook,
            dtc_audit,
            timestamp: Utc::now(),
        })
    }

    /// Exports a report with the format carried in the body (`POST /api/export`).
    ///
    /// # Errors
    ///
    /// See [`IntelligenceClient::call_api_binary`].
    pub async fn export_analysis(&self, report: &ReportRequest) -> Result<Download, ApiError> {
        self.call_api_binary(EXPORT_PATH, report).await
    }

    /// Exports a report in `format` (`POST /api/export/report?format=`).
    ///
    /// # Errors
    ///
    /// See [`IntelligenceClient::call_api_binary`].
    pub async fn export_report(
        &self,
        report: &ReportRequest,
        format: ExportFormat,
    ) -> Result<Download, ApiError> {
        let path = format!("{EXPORT_REPORT_PATH}?format={}", format.as_str());
        self.call_api_binary(&path, report).await
    }
}
