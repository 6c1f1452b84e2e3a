//! Reverse proxy for `/api/*`.
//!
//! Requests are buffered, forwarded to the configured upstream origin with
//! the same method, path, query, headers and body, and the upstream response
//! is returned unchanged apart from hop-by-hop headers.

use std::net::SocketAddr;

use axum::{
    body::{Body, Bytes},
    extract::{ConnectInfo, Request, State},
    http::{
        header::{self, HeaderMap, HeaderName},
        HeaderValue, StatusCode, Uri,
    },
    response::{IntoResponse, Response},
    Json,
};
use futures::StreamExt;
use reqwest::Url;
use serde::Serialize;

use crate::{api::AppState, middleware::RequestId};

/// Headers that describe a single connection and are never forwarded.
const HOP_BY_HOP: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

const X_FORWARDED_FOR: &str = "x-forwarded-for";
const X_FORWARDED_HOST: &str = "x-forwarded-host";
const X_FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Upstream target and the HTTP client used to reach it.
#[derive(Debug, Clone)]
pub struct ProxyState {
    client: reqwest::Client,
    upstream: Url,
    max_body_bytes: usize,
}

impl ProxyState {
    /// Builds proxy state for `backend_url`.
    ///
    /// Redirects are passed through to the caller rather than followed.
    ///
    /// # Errors
    ///
    /// Fails if `backend_url` is not an absolute URL or the HTTP client
    /// cannot be constructed.
    pub fn new(backend_url: &str, max_body_bytes: usize) -> anyhow::Result<Self> {
        let upstream = Url::parse(backend_url.trim_end_matches('/'))
            .map_err(|e| anyhow::anyhow!("invalid BACKEND_URL '{backend_url}': {e}"))?;
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        Ok(Self {
            client,
            upstream,
            max_body_bytes,
        })
    }

    #[must_use]
    pub fn upstream(&self) -> &Url {
        &self.upstream
    }

    /// Upstream URL for an incoming request URI: upstream origin plus the
    /// original path and query.
    fn target_url(&self, uri: &Uri) -> Result<Url, String> {
        let path_and_query = uri.path_and_query().map_or("/", |pq| pq.as_str());
        let base = self.upstream.as_str().trim_end_matches('/');
        Url::parse(&format!("{base}{path_and_query}")).map_err(|e| e.to_string())
    }
}

#[derive(Debug, Serialize)]
struct ProxyErrorBody {
    error: ProxyError,
}

#[derive(Debug, Serialize)]
struct ProxyError {
    code: &'static str,
    message: String,
}

fn proxy_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        Json(ProxyErrorBody {
            error: ProxyError {
                code,
                message: message.into(),
            },
        }),
    )
        .into_response()
}

fn strip_hop_by_hop(headers: &mut HeaderMap) {
    // `Connection` may name further per-connection headers.
    let named: Vec<HeaderName> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .filter_map(|name| HeaderName::from_bytes(name.trim().as_bytes()).ok())
        .collect();
    for name in named {
        headers.remove(name);
    }
    for name in HOP_BY_HOP {
        headers.remove(*name);
    }
}

fn append_forwarded(headers: &mut HeaderMap, name: &'static str, value: &str) {
    let combined = match headers.get(name).and_then(|v| v.to_str().ok()) {
        Some(existing) if !existing.is_empty() => format!("{existing}, {value}"),
        _ => value.to_owned(),
    };
    if let Ok(v) = HeaderValue::from_str(&combined) {
        headers.insert(name, v);
    }
}

/// Headers sent upstream: the client's headers without hop-by-hop entries,
/// `Host` left for the client to set from the upstream URL, and the
/// `X-Forwarded-*` headers describing the original request.
fn upstream_headers(original: &HeaderMap, client_ip: Option<SocketAddr>) -> HeaderMap {
    let mut headers = original.clone();
    strip_hop_by_hop(&mut headers);
    let original_host = headers.remove(header::HOST);
    headers.remove(header::CONTENT_LENGTH);

    if let Some(addr) = client_ip {
        append_forwarded(&mut headers, X_FORWARDED_FOR, &addr.ip().to_string());
    }
    append_forwarded(&mut headers, X_FORWARDED_PROTO, "http");
    if !headers.contains_key(X_FORWARDED_HOST) {
        if let Some(host) = original_host {
            headers.insert(X_FORWARDED_HOST, host);
        }
    }
    headers
}

/// Why a request body could not be buffered.
#[derive(Debug)]
enum BodyError {
    TooLarge,
    Read(axum::Error),
}

/// Buffers `body`, stopping as soon as it grows past `limit` bytes. Streamed
/// and chunked bodies carry no `Content-Length` and are caught here.
async fn read_body(body: Body, limit: usize) -> Result<Bytes, BodyError> {
    let mut stream = body.into_data_stream();
    let mut buf = Vec::new();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(BodyError::Read)?;
        if buf.len() + chunk.len() > limit {
            return Err(BodyError::TooLarge);
        }
        buf.extend_from_slice(&chunk);
    }
    Ok(Bytes::from(buf))
}

fn payload_too_large(limit: usize) -> Response {
    proxy_error(
        StatusCode::PAYLOAD_TOO_LARGE,
        "payload_too_large",
        format!("request body exceeds {limit} bytes"),
    )
}

/// Handler for every method under `/api`.
pub async fn forward(State(state): State<AppState>, req: Request) -> Response {
    let proxy = &state.proxy;
    let (parts, body) = req.into_parts();

    let target = match proxy.target_url(&parts.uri) {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!(uri = %parts.uri, error = %e, "could not build upstream URL");
            return proxy_error(StatusCode::BAD_REQUEST, "bad_request", "invalid request path");
        }
    };

    let declared_len = parts
        .headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok());
    if declared_len.is_some_and(|len| len > proxy.max_body_bytes) {
        return payload_too_large(proxy.max_body_bytes);
    }

    let body = match read_body(body, proxy.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(BodyError::TooLarge) => return payload_too_large(proxy.max_body_bytes),
        Err(BodyError::Read(e)) => {
            tracing::warn!(error = %e, "failed to read request body");
            return proxy_error(
                StatusCode::BAD_REQUEST,
                "bad_request",
                "request body could not be read",
            );
        }
    };

    let client_ip = parts
        .extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let headers = upstream_headers(&parts.headers, client_ip);

    let request_id = parts
        .extensions
        .get::<RequestId>()
        .map_or("-", |RequestId(id)| id.as_str())
        .to_owned();
    let method = parts.method;
    tracing::debug!(%method, %target, %request_id, "proxying request");

    let upstream_response = match proxy
        .client
        .request(method.clone(), target.clone())
        .headers(headers)
        .body(body)
        .send()
        .await
    {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!(
                %method,
                upstream = %proxy.upstream,
                %request_id,
                error = %e,
                "upstream request failed"
            );
            return proxy_error(
                StatusCode::BAD_GATEWAY,
                "bad_gateway",
                "upstream request failed",
            );
        }
    };

    let status = upstream_response.status();
    let mut response_headers = upstream_response.headers().clone();
    strip_hop_by_hop(&mut response_headers);
    response_headers.remove(header::CONTENT_LENGTH);

    let bytes = match upstream_response.bytes().await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(%target, error = %e, "failed to read upstream response body");
            return proxy_error(
                StatusCode::BAD_GATEWAY,
                "bad_gateway",
                "upstream response could not be read",
            );
        }
    };

    if status.is_server_error() {
        tracing::warn!(
            %method,
            path = target.path(),
            status = status.as_u16(),
            %request_id,
            "upstream error"
        );
    }

    let mut response = Response::new(Body::from(bytes));
    *response.status_mut() = status;
    *response.headers_mut() = response_headers;
    response
}
