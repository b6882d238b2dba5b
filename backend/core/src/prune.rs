//! Tail pruning: keep the opening exchange and the last N turns.
//!
//! The transformation locates the tree root, walks the active path,
//! pins the first user/assistant exchange, collects a bounded tail of
//! recent turns ending at `current_node`, then splices the tail
//! directly onto the opening exchange and drops everything in between.
//!
//! Every ambiguous input (no resolvable root, no opening exchange, a
//! tail that already reaches the opening exchange) leaves the
//! conversation exactly as received. The keep-set is computed in full
//! before the first mutation, so a skipped prune never touches the
//! payload.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::tree::{Conversation, Node};

/// Well-known root ids, checked before falling back to a parent scan.
const ROOT_ID: &str = "root";
const CLIENT_ROOT_ID: &str = "client-created-root";

/// Result of a pruning attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PruneOutcome {
    /// The conversation was re-linked and `removed` nodes were dropped.
    Pruned { removed: usize },
    /// The conversation was left exactly as received.
    Skipped(SkipReason),
}

/// Why a pruning attempt left the conversation unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Retention bound absent or not positive.
    RetentionDisabled,
    /// Payload has no node mapping.
    MissingMapping,
    /// `current_node` absent, or not an id in the mapping.
    MissingCurrentNode,
    /// No root node could be resolved.
    NoRoot,
    /// No first user/assistant pair exists on the active path.
    NoOpeningExchange,
    /// The retained tail runs into the opening exchange or the root;
    /// everything recent is already within the bound.
    TailReachesOpening,
}

/// Prune `conversation` in place so that only the opening exchange and
/// the most recent `keep_tail` turn nodes (ending at `current_node`)
/// survive.
///
/// A `None` or non-positive bound disables pruning. All failure modes
/// are fail-open: the outcome says why nothing happened, and the
/// payload is untouched.
pub fn prune_conversation(
    conversation: &mut Conversation,
    keep_tail: Option<i64>,
) -> PruneOutcome {
    let keep_tail = match keep_tail {
        Some(n) if n > 0 => n as usize,
        _ => return PruneOutcome::Skipped(SkipReason::RetentionDisabled),
    };

    let Some(mapping) = conversation.mapping.as_mut() else {
        return PruneOutcome::Skipped(SkipReason::MissingMapping);
    };
    let Some(current) = conversation.current_node.clone() else {
        return PruneOutcome::Skipped(SkipReason::MissingCurrentNode);
    };
    if !mapping.contains_key(&current) {
        return PruneOutcome::Skipped(SkipReason::MissingCurrentNode);
    }

    let Some(root_id) = find_root_id(mapping) else {
        return PruneOutcome::Skipped(SkipReason::NoRoot);
    };

    let path = build_path_ids(mapping, &current);
    let Some((first_user_id, first_assistant_id)) = find_first_exchange(&path, mapping) else {
        return PruneOutcome::Skipped(SkipReason::NoOpeningExchange);
    };

    // Collect the keep-set: the reserved opening exchange plus a tail
    // of recent turns walked upward from the current node.
    let mut keep: HashSet<String> = HashSet::new();
    keep.insert(root_id.clone());
    keep.insert(first_user_id.clone());
    keep.insert(first_assistant_id.clone());

    let mut earliest_kept = current.clone();
    let mut kept_turns = 0usize;
    let mut cursor = Some(current);
    while let Some(id) = cursor {
        let Some(node) = mapping.get(&id) else { break };
        if id == first_assistant_id || id == first_user_id || id == root_id {
            // The live tail already runs into the reserved opening
            // exchange: there is nothing safe to cut.
            return PruneOutcome::Skipped(SkipReason::TailReachesOpening);
        }
        keep.insert(id.clone());
        earliest_kept = id.clone();
        if node.is_turn_node() {
            kept_turns += 1;
            if kept_turns >= keep_tail {
                break;
            }
        }
        cursor = node.parent.clone();
    }

    // Splice: root -> firstUser -> firstAssistant -> earliestKept.
    relink(mapping, &earliest_kept, &first_assistant_id);
    relink(mapping, &first_assistant_id, &first_user_id);
    relink(mapping, &first_user_id, &root_id);

    // Normalize the survivors' references to the keep-set before
    // deleting anything, so no kept node points at a dropped id.
    for id in &keep {
        let Some(node) = mapping.get_mut(id) else { continue };
        if node.parent.as_ref().is_some_and(|p| !keep.contains(p)) {
            node.parent = None;
        }
        if let Some(children) = node.children.as_mut() {
            children.retain(|c| keep.contains(c));
        }
    }

    let before = mapping.len();
    mapping.retain(|id, _| keep.contains(id));
    let removed = before - mapping.len();
    debug!(removed, kept = mapping.len(), "pruned conversation tail");
    PruneOutcome::Pruned { removed }
}

/// Resolve the tree's root id.
///
/// The service uses a couple of well-known ids; failing those, the
/// first parentless entry in mapping iteration order is taken.
fn find_root_id(mapping: &HashMap<String, Node>) -> Option<String> {
    if mapping.contains_key(ROOT_ID) {
        return Some(ROOT_ID.to_string());
    }
    if mapping.contains_key(CLIENT_ROOT_ID) {
        return Some(CLIENT_ROOT_ID.to_string());
    }
    mapping
        .iter()
        .find(|(_, node)| node.parent.is_none())
        .map(|(id, _)| id.clone())
}

/// Ids from the root down to `current`, oldest first.
///
/// The walk is bounded by the mapping size so a malformed cyclic
/// parent chain cannot spin forever. A broken chain yields a partial
/// path, which downstream treats as "opening exchange not found".
fn build_path_ids(mapping: &HashMap<String, Node>, current: &str) -> Vec<String> {
    let mut ids = Vec::new();
    let mut cursor = Some(current.to_string());
    while let Some(id) = cursor {
        if ids.len() >= mapping.len() {
            break;
        }
        let Some(node) = mapping.get(&id) else { break };
        ids.push(id);
        cursor = node.parent.clone();
    }
    ids.reverse();
    ids
}

/// The first user node on the path, paired with the nearest following
/// assistant node that has visible content. Both or neither: a lone
/// user message is not an opening exchange.
fn find_first_exchange(
    path: &[String],
    mapping: &HashMap<String, Node>,
) -> Option<(String, String)> {
    let (idx, first_user) = path
        .iter()
        .enumerate()
        .find(|(_, id)| mapping.get(*id).and_then(Node::role) == Some("user"))?;

    let first_assistant = path[idx + 1..].iter().find(|id| {
        mapping
            .get(*id)
            .is_some_and(|n| n.role() == Some("assistant") && n.has_nonempty_part())
    })?;

    Some((first_user.clone(), first_assistant.clone()))
}

/// Point `child` at `parent` and register the edge on the parent's
/// child list. Appending is idempotent; the child list is created if
/// the service omitted it.
fn relink(mapping: &mut HashMap<String, Node>, child_id: &str, parent_id: &str) {
    if let Some(child) = mapping.get_mut(child_id) {
        child.parent = Some(parent_id.to_string());
    }
    if let Some(parent) = mapping.get_mut(parent_id) {
        let children = parent.children.get_or_insert_with(Vec::new);
        if !children.iter().any(|c| c == child_id) {
            children.push(child_id.to_string());
        }
    }
}
