//! Decoding of the `scontrol show node --json` document.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use slurm_now_core::NodeRecord;

use crate::error::{SnapshotError, SnapshotResult};

#[derive(Debug, Deserialize)]
struct SnapshotDocument {
    nodes: Vec<Value>,
    #[serde(default)]
    errors: Vec<Value>,
}

/// Decode a full node document.
///
/// Manager-reported errors fail the whole snapshot. Individual node objects
/// that don't fit [`NodeRecord`] are skipped.
pub fn decode_document(bytes: &[u8]) -> SnapshotResult<Vec<NodeRecord>> {
    let doc: SnapshotDocument = serde_json::from_slice(bytes)?;

    if !doc.errors.is_empty() {
        let messages: Vec<String> = doc.errors.iter().map(error_message).collect();
        return Err(SnapshotError::Manager(messages.join("; ")));
    }

    let total = doc.nodes.len();
    let records: Vec<NodeRecord> = doc
        .nodes
        .into_iter()
        .filter_map(|raw| match serde_json::from_value::<NodeRecord>(raw.clone()) {
            Ok(record) => Some(record),
            Err(e) => {
                debug!(error = %e, node = %raw, "skipping undecodable node");
                None
            }
        })
        .collect();

    debug!(total, decoded = records.len(), "decoded node snapshot");
    Ok(records)
}

fn error_message(err: &Value) -> String {
    ["description", "error"]
        .iter()
        .filter_map(|key| err.get(*key).and_then(Value::as_str))
        .find(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| err.to_string())
}
