//! Conversation tree data model.
//!
//! Mirrors the wire shape of a conversation payload fetched from the
//! backend API: a flat mapping of message nodes keyed by id, linked by
//! `parent`/`children` references, plus the id of the active tip.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A conversation payload as fetched from the backend API.
///
/// Only the fields the pruner interprets are typed. Everything else
/// (`title`, `create_time`, moderation results, ...) rides along in
/// `extra` and is re-serialized as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mapping: Option<HashMap<String, Node>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_node: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One node in the conversation tree.
///
/// `parent` is the structural source of truth; `children` is the
/// service's denormalized reverse index and is kept consistent with
/// the parent links on output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Message body carried by a node. Every field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Author {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Message content. Parts are opaque to the pruner; only string parts
/// count as text when deciding whether a node has visible content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parts: Option<Vec<Value>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_user_system_message: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_visually_hidden_from_conversation: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Node {
    /// Author role, if the node carries a message with one.
    pub fn role(&self) -> Option<&str> {
        self.message.as_ref()?.author.as_ref()?.role.as_deref()
    }

    /// Whether the message carries at least one non-empty string
    /// content part.
    pub fn has_nonempty_part(&self) -> bool {
        self.message
            .as_ref()
            .and_then(|m| m.content.as_ref())
            .and_then(|c| c.parts.as_ref())
            .map(|parts| {
                parts
                    .iter()
                    .any(|p| p.as_str().is_some_and(|s| !s.is_empty()))
            })
            .unwrap_or(false)
    }

    fn is_user_system_message(&self) -> bool {
        self.message
            .as_ref()
            .and_then(|m| m.metadata.as_ref())
            .and_then(|md| md.is_user_system_message)
            .unwrap_or(false)
    }

    fn is_visually_hidden(&self) -> bool {
        self.message
            .as_ref()
            .and_then(|m| m.metadata.as_ref())
            .and_then(|md| md.is_visually_hidden_from_conversation)
            .unwrap_or(false)
    }

    /// Whether this node counts toward the retention bound.
    ///
    /// User nodes qualify unconditionally. Assistant nodes qualify only
    /// when they carry visible content and are neither system-injected
    /// nor hidden from the conversation view.
    pub fn is_turn_node(&self) -> bool {
        match self.role() {
            Some("user") => true,
            Some("assistant") => {
                self.has_nonempty_part()
                    && !self.is_user_system_message()
                    && !self.is_visually_hidden()
            }
            _ => false,
        }
    }
}
