//! Error types for node normalization and configuration.

use thiserror::Error;

/// Per-node defects. These never abort a query: the offending node is
/// dropped and the rest of the snapshot is still searched.
#[derive(Debug, Error)]
pub enum NodeError {
    /// A GRES string failed to parse, or the configured and in-use
    /// descriptors disagree on the GPU type.
    #[error("node {node}: malformed resource descriptor: {detail}")]
    MalformedResourceDescriptor { node: String, detail: String },

    #[error("node {node}: negative idle {resource} ({total} total, {used} in use)")]
    NegativeIdleResource {
        node: String,
        resource: &'static str,
        total: i64,
        used: i64,
    },

    #[error("invalid node record: {0}")]
    InvalidRecord(String),
}

pub type NodeResult<T> = Result<T, NodeError>;

/// Errors loading a `slurm-now.toml` file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("set either partition_regex or exclude_partitions, not both")]
    ConflictingPartitionFilters,

    #[error("invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

pub type ConfigResult<T> = Result<T, ConfigError>;
