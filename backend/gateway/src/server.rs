//! Relay HTTP server.
//!
//! A single fallback handler relays every request to the upstream;
//! targeted conversation fetches get their response body pruned on the
//! way back.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use uuid::Uuid;

use tailgate_logging::{EventLogger, RelayEvent};

use crate::relay;
use crate::rewrite::{RewriteOutcome, rewrite_conversation_body};
use crate::targeting;

/// Shared state for the relay.
pub struct GatewayState {
    /// Upstream base URL, e.g. `https://chatgpt.com`.
    pub upstream_base: String,
    /// Retention bound handed to the pruner per targeted response.
    pub keep_tail_count: Option<i64>,
    pub client: reqwest::Client,
}

impl GatewayState {
    pub fn new(upstream_base: String, keep_tail_count: Option<i64>) -> Self {
        Self {
            upstream_base,
            keep_tail_count,
            client: reqwest::Client::new(),
        }
    }
}

/// Build the relay router.
pub fn router(state: Arc<GatewayState>) -> Router {
    Router::new()
        .route("/tailgate/health", get(|| async { "OK" }))
        .fallback(relay_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the relay server and serve until shutdown.
pub async fn start_server(addr: SocketAddr, state: Arc<GatewayState>) -> Result<()> {
    let app = router(state);
    info!("relay listening on {addr}");
    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn relay_handler(State(state): State<Arc<GatewayState>>, request: Request) -> Response {
    let started = Instant::now();
    let request_id = Uuid::new_v4().to_string();
    let method = request.method().clone();
    let path_and_query = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());
    let headers = request.headers().clone();

    let body = match to_bytes(request.into_body(), usize::MAX).await {
        Ok(body) => body,
        Err(error) => {
            warn!(%request_id, %error, "failed to read request body");
            return (StatusCode::BAD_REQUEST, "unreadable request body").into_response();
        }
    };

    let upstream = match relay::forward(
        &state.client,
        &state.upstream_base,
        method.clone(),
        &path_and_query,
        &headers,
        body,
    )
    .await
    {
        Ok(upstream) => upstream,
        Err(error) => {
            warn!(%request_id, %error, "relay failed");
            return (StatusCode::BAD_GATEWAY, "upstream relay failed").into_response();
        }
    };

    let response_headers = upstream.headers;
    let mut response_body = upstream.body;
    let mut rewritten = false;
    let mut nodes_removed = 0;

    if targeting::is_target(&method, &path_and_query) {
        if let RewriteOutcome::Rewritten { body, removed } =
            rewrite_conversation_body(&response_body, state.keep_tail_count)
        {
            response_body = body.into();
            rewritten = true;
            nodes_removed = removed;
        }
    }

    EventLogger::log_relay(
        &request_id,
        RelayEvent {
            method: method.to_string(),
            path: path_and_query,
            upstream_status: upstream.status.as_u16(),
            rewritten,
            nodes_removed,
            elapsed_ms: started.elapsed().as_millis(),
        },
    );

    let mut builder = Response::builder().status(upstream.status);
    if let Some(headers) = builder.headers_mut() {
        *headers = response_headers;
    }
    match builder.body(Body::from(response_body)) {
        Ok(response) => response,
        Err(error) => {
            warn!(%request_id, %error, "failed to assemble relayed response");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
