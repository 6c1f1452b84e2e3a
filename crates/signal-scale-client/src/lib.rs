pub mod agents;
pub mod body;
pub mod client;
pub mod dashboard;
pub mod download;
pub mod error;

pub use agents::{Agent, AgentBoard, AgentPhase, DEFAULT_PACING_DELAY};
pub use body::{empty_body_sentinel, EMPTY_BODY_NOTICE};
pub use client::{AgentResults, IntelligenceClient, ReportRequest};
pub use dashboard::{AnalysisOutcome, Dashboard, FAILURE_INDICATOR};
pub use download::{Download, CSV_EXPORT_FILENAME};
pub use error::{ApiError, ErrorBody};
