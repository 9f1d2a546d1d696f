//! Search error types.

use thiserror::Error;

/// Errors that abort a whole search. Per-node defects never surface here.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("snapshot unavailable: {0}")]
    SnapshotUnavailable(#[from] slurm_now_snapshot::SnapshotError),
}
