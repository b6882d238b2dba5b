//! One-shot pruning of a conversation JSON document.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use tailgate_core::{Conversation, PruneOutcome, prune_conversation};

/// Read a conversation document, prune it, and write the result.
///
/// A skipped prune still writes the (unchanged) document; the skip
/// reason goes to stderr so pipelines stay composable.
pub fn run(input: &Path, keep: Option<i64>, output: Option<&Path>) -> Result<()> {
    let raw = read_input(input)?;

    let mut conversation: Conversation = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a conversation document", input.display()))?;

    match prune_conversation(&mut conversation, keep) {
        PruneOutcome::Pruned { removed } => {
            info!(removed, "pruned conversation");
        }
        PruneOutcome::Skipped(reason) => {
            eprintln!("nothing pruned: {reason:?}");
        }
    }

    let rendered =
        serde_json::to_string(&conversation).context("failed to serialize pruned conversation")?;
    match output {
        Some(path) => std::fs::write(path, rendered)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => println!("{rendered}"),
    }
    Ok(())
}

fn read_input(input: &Path) -> Result<String> {
    if input == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[test]
    fn prunes_a_document_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("conversation.json");
        let output = dir.path().join("pruned.json");

        let payload = json!({
            "current_node": "a2",
            "mapping": {
                "root": { "children": ["u1"] },
                "u1": { "parent": "root", "children": ["a1"],
                        "message": { "author": { "role": "user" }, "content": { "parts": ["q1"] } } },
                "a1": { "parent": "u1", "children": ["u2"],
                        "message": { "author": { "role": "assistant" }, "content": { "parts": ["r1"] } } },
                "u2": { "parent": "a1", "children": ["a2"],
                        "message": { "author": { "role": "user" }, "content": { "parts": ["q2"] } } },
                "a2": { "parent": "u2", "children": [],
                        "message": { "author": { "role": "assistant" }, "content": { "parts": ["r2"] } } }
            }
        });
        std::fs::write(&input, serde_json::to_string(&payload).unwrap()).unwrap();

        run(&input, Some(1), Some(&output)).unwrap();

        let pruned: Value =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert!(pruned["mapping"].get("u2").is_none());
        assert_eq!(pruned["mapping"]["a2"]["parent"], "a1");
    }

    #[test]
    fn non_conversation_input_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("not-json.txt");
        std::fs::write(&input, "plain text").unwrap();

        assert!(run(&input, Some(1), None).is_err());
    }
}
