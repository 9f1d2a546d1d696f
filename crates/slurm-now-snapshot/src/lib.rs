//! slurm-now-snapshot: point-in-time node snapshots from Slurm.
//!
//! A [`SnapshotReader`] produces the raw [`NodeRecord`]s for one query.
//! Readers fail as a whole: a timeout, a non-zero exit, an unreadable
//! document, or errors reported by the manager abort the query. A single
//! node object that doesn't decode is dropped with a debug diagnostic.
//!
//! # Readers
//!
//! - **`ScontrolReader`**: runs `scontrol show node --all --json` with a timeout
//! - **`FileReader`**: reads a saved copy of that document

pub mod document;
pub mod error;
pub mod file;
pub mod scontrol;

use std::future::Future;
use std::pin::Pin;

use slurm_now_core::NodeRecord;

pub use document::decode_document;
pub use error::{SnapshotError, SnapshotResult};
pub use file::FileReader;
pub use scontrol::ScontrolReader;

/// Boxed future returned by [`SnapshotReader::read_nodes`].
pub type SnapshotFuture<'a> =
    Pin<Box<dyn Future<Output = SnapshotResult<Vec<NodeRecord>>> + Send + 'a>>;

/// Source of a node snapshot. Injected so searches can run against saved
/// documents or test fixtures.
pub trait SnapshotReader: Send + Sync {
    fn read_nodes(&self) -> SnapshotFuture<'_>;
}
