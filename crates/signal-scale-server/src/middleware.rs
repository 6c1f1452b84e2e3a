use axum::{
    extract::Request,
    http::{
        header::{CACHE_CONTROL, CONTENT_TYPE},
        HeaderValue, StatusCode,
    },
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

/// Long-lived caching for fingerprinted build output under `/assets/`.
pub const IMMUTABLE_CACHE: &str = "public, max-age=31536000, immutable";
/// Everything else on disk is revalidated on every load.
pub const REVALIDATE_CACHE: &str = "public, max-age=0";

/// Newtype wrapping a request ID string, stored as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Axum middleware that extracts or generates a request ID.
///
/// If the incoming request has an `x-request-id` header, that value is used.
/// Otherwise a new `UUIDv4` is generated. The ID is:
/// - Inserted into request extensions as [`RequestId`]
/// - Set on the response as the `x-request-id` header
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).await;

    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert("x-request-id", val);
    }

    res
}

/// Sets `Cache-Control` on static file responses that do not already carry one.
pub async fn cache_control(req: Request, next: Next) -> Response {
    let under_assets = req.uri().path().starts_with("/assets/");
    let mut res = next.run(req).await;

    if !(res.status().is_success() || res.status() == StatusCode::NOT_MODIFIED) {
        return res;
    }

    // A missing asset falls back to the HTML shell, which must not be pinned.
    let is_html = res
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("text/html"));

    let policy = if under_assets && !is_html {
        IMMUTABLE_CACHE
    } else {
        REVALIDATE_CACHE
    };

    res.headers_mut()
        .entry(CACHE_CONTROL)
        .or_insert(HeaderValue::from_static(policy));
    res
}
