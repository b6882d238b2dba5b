pub mod prune;
pub mod tree;

pub use prune::{prune_conversation, PruneOutcome, SkipReason};
pub use tree::{Author, Content, Conversation, Message, Metadata, Node};
