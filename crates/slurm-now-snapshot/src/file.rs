//! Snapshots read from a saved `scontrol show node --json` document.

use std::path::PathBuf;

use tracing::info;

use crate::document::decode_document;
use crate::error::SnapshotError;
use crate::{SnapshotFuture, SnapshotReader};

#[derive(Debug, Clone)]
pub struct FileReader {
    pub path: PathBuf,
}

impl FileReader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SnapshotReader for FileReader {
    fn read_nodes(&self) -> SnapshotFuture<'_> {
        Box::pin(async move {
            let bytes = tokio::fs::read(&self.path)
                .await
                .map_err(|source| SnapshotError::Io {
                    path: self.path.display().to_string(),
                    source,
                })?;
            info!(path = %self.path.display(), bytes = bytes.len(), "loaded saved node snapshot");
            decode_document(&bytes)
        })
    }
}
