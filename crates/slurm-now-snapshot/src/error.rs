//! Snapshot errors. Every variant means no snapshot is available.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("node query timed out after {0:?}")]
    Timeout(Duration),

    #[error("{program} exited with {status}: {stderr}")]
    ExitStatus {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("failed to decode node snapshot: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("cluster manager reported errors: {0}")]
    Manager(String),

    #[error("failed to read snapshot {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type SnapshotResult<T> = Result<T, SnapshotError>;
