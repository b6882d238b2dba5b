//! Upstream request forwarding.
//!
//! Rebuilds the intercepted request against the configured upstream
//! base URL and captures the response whole, so the rewrite step can
//! inspect the body before anything is sent back to the client.

use axum::body::Bytes;
use axum::http::{HeaderMap, HeaderName, Method, StatusCode};
use thiserror::Error;
use tracing::debug;

/// Errors from talking to the upstream. These surface to the client as
/// a 502, never as a panic.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),
}

/// A fully buffered upstream response.
#[derive(Debug)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Headers that must not be forwarded in either direction.
///
/// `host` and `content-length` are re-derived per hop;
/// `accept-encoding` is dropped so the upstream answers with an
/// identity body the rewriter can actually parse.
const STRIPPED_HEADERS: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
    "host",
    "content-length",
    "accept-encoding",
];

fn is_stripped(name: &HeaderName) -> bool {
    STRIPPED_HEADERS.contains(&name.as_str())
}

/// Forward one request to the upstream and buffer the full response.
pub async fn forward(
    client: &reqwest::Client,
    base_url: &str,
    method: Method,
    path_and_query: &str,
    headers: &HeaderMap,
    body: Bytes,
) -> Result<UpstreamResponse, RelayError> {
    let url = format!("{}{}", base_url.trim_end_matches('/'), path_and_query);
    debug!(%method, %url, "forwarding to upstream");

    let mut forwarded = HeaderMap::new();
    for (name, value) in headers {
        if !is_stripped(name) {
            forwarded.append(name.clone(), value.clone());
        }
    }

    let response = client
        .request(method, &url)
        .headers(forwarded)
        .body(body)
        .send()
        .await?;

    let status = response.status();
    let mut captured = HeaderMap::new();
    for (name, value) in response.headers() {
        if !is_stripped(name) {
            captured.append(name.clone(), value.clone());
        }
    }
    let body = response.bytes().await?;

    Ok(UpstreamResponse {
        status,
        headers: captured,
        body,
    })
}
