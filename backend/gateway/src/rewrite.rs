//! Conversation payload rewriting.
//!
//! Decodes an intercepted response body, applies the tail-pruning
//! transformation, re-encodes. Every failure path hands the original
//! bytes back untouched; a malformed payload must never surface as an
//! error to the client.

use tailgate_core::{Conversation, PruneOutcome, prune_conversation};
use tracing::{debug, warn};

/// What happened to an intercepted body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewriteOutcome {
    /// The payload was pruned and re-encoded.
    Rewritten { body: Vec<u8>, removed: usize },
    /// The original bytes should be passed through.
    Unchanged,
}

/// Try to prune a conversation body. `keep_tail` follows the core's
/// contract: `None` or non-positive disables pruning.
pub fn rewrite_conversation_body(body: &[u8], keep_tail: Option<i64>) -> RewriteOutcome {
    let mut conversation: Conversation = match serde_json::from_slice(body) {
        Ok(conversation) => conversation,
        Err(error) => {
            debug!(%error, "body is not a conversation payload; passing through");
            return RewriteOutcome::Unchanged;
        }
    };

    match prune_conversation(&mut conversation, keep_tail) {
        PruneOutcome::Pruned { removed } => match serde_json::to_vec(&conversation) {
            Ok(body) => RewriteOutcome::Rewritten { body, removed },
            Err(error) => {
                warn!(%error, "failed to re-encode pruned conversation; passing through");
                RewriteOutcome::Unchanged
            }
        },
        PruneOutcome::Skipped(reason) => {
            debug!(?reason, "prune skipped; passing through");
            RewriteOutcome::Unchanged
        }
    }
}
