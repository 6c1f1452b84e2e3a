use std::fmt;

use signal_scale_core::CoreError;
use thiserror::Error;

/// Best-effort decoded body of a failed response.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorBody {
    Json(serde_json::Value),
    Text(String),
    Empty,
}

impl fmt::Display for ErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorBody::Json(value) => write!(f, "{value}"),
            ErrorBody::Text(text) => f.write_str(text),
            ErrorBody::Empty => f.write_str("[no body]"),
        }
    }
}

/// Errors returned by the intelligence API client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network, DNS, TLS or timeout failure from the underlying HTTP client.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status.
    #[error("API {status} {status_text}: {body}")]
    Status {
        status: u16,
        status_text: String,
        body: ErrorBody,
    },

    #[error("invalid API base URL '{base}': {reason}")]
    InvalidBaseUrl { base: String, reason: String },

    #[error("invalid request: {0}")]
    Validation(#[from] CoreError),
}

impl ApiError {
    /// HTTP status for [`ApiError::Status`], `None` otherwise.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
