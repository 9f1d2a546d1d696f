//! Core types for slurm-now: snapshot records, normalized GPU availability,
//! search results, name patterns, and configuration.

pub mod config;
pub mod error;
pub mod gres;
pub mod node;
pub mod pattern;
pub mod types;

pub use config::NowConfig;
pub use error::{ConfigError, ConfigResult, NodeError, NodeResult};
pub use gres::{GresDescriptor, GresError};
pub use node::{MIB_TO_GB, NodeResource, UNAVAILABLE_RATIO, normalize_all};
pub use pattern::{DEFAULT_EXCLUDED_PARTITIONS, PartitionFilter, Pattern};
pub use types::*;
