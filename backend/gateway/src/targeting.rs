//! Request targeting: which relayed requests are eligible for rewriting.

use axum::http::Method;
use once_cell::sync::Lazy;
use regex::Regex;

/// Conversation fetches: `GET /backend-api/conversation/{uuid}`.
/// Anchored, so a query string or trailing segment opts the request
/// out of rewriting.
static CONVERSATION_PATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^/backend-api/conversation/[0-9a-fA-F-]{36}$").unwrap());

/// Only conversation fetches are rewritten; everything else relays
/// verbatim.
pub fn is_target(method: &Method, path_and_query: &str) -> bool {
    *method == Method::GET && CONVERSATION_PATH.is_match(path_and_query)
}
