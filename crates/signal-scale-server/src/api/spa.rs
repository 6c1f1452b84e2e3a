use std::path::Path;

use axum::Router;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    services::{ServeDir, ServeFile},
};

use crate::middleware::cache_control;

/// Static file service for the built frontend.
///
/// Unknown paths are answered with `index.html` so client-side routes
/// survive a reload.
pub(super) fn service(static_dir: &Path) -> Router {
    let files = ServeDir::new(static_dir).fallback(ServeFile::new(static_dir.join("index.html")));

    Router::new().fallback_service(files).layer(
        ServiceBuilder::new()
            .layer(CompressionLayer::new())
            .layer(axum::middleware::from_fn(cache_control)),
    )
}
