mod spa;

use std::path::Path;

use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::{any, get},
    Json, Router,
};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::{middleware::request_id, proxy::ProxyState};

const FRONTEND_NAME: &str = "signal-scale";

#[derive(Debug, Clone)]
pub struct AppState {
    pub proxy: ProxyState,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    ok: bool,
    frontend: &'static str,
}

/// Builds the edge router: health check, `/api` proxy and the SPA bundle
/// under `static_dir` for everything else.
pub fn build_app(state: AppState, static_dir: &Path) -> Router {
    Router::new()
        .route("/healthz", get(health))
        .route("/api", any(crate::proxy::forward))
        .route("/api/", any(crate::proxy::forward))
        .route("/api/{*rest}", any(crate::proxy::forward))
        .fallback_service(spa::service(static_dir))
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(request_id))
                .layer(TraceLayer::new_for_http()),
        )
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthData {
            ok: true,
            frontend: FRONTEND_NAME,
        }),
    )
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
