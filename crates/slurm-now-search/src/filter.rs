//! Per-node eligibility.
//!
//! A node passes when all of these hold:
//! - every state flag it carries is `IDLE` or `MIXED`
//! - it has at least one idle GPU
//! - its GPU type matches the requested pattern
//! - idle CPUs per idle GPU and idle GB per idle GPU meet the minimums
//!   (equality passes)
//! - at least one of its partitions is accepted by the partition filter

use std::collections::BTreeSet;
use std::fmt;

use slurm_now_core::NodeResource;
use tracing::debug;

use crate::params::SearchParams;

/// State flags a node may carry and still accept work immediately.
pub const ALLOWED_STATES: [&str; 2] = ["IDLE", "MIXED"];

/// Why a node was left out of the search.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    State(String),
    NoIdleGpus,
    GpuType(String),
    CpuPerGpu(f64),
    MemPerGpu(f64),
    NoAcceptedPartition,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::State(flag) => write!(f, "state flag {flag} is not schedulable"),
            SkipReason::NoIdleGpus => write!(f, "no idle GPUs"),
            SkipReason::GpuType(t) => write!(f, "GPU type {t} not requested"),
            SkipReason::CpuPerGpu(v) => write!(f, "only {v:.2} idle CPUs per GPU"),
            SkipReason::MemPerGpu(v) => write!(f, "only {v:.2} GB idle memory per GPU"),
            SkipReason::NoAcceptedPartition => write!(f, "no accepted partition"),
        }
    }
}

/// Check a single node against the search constraints.
pub fn check_node(node: &NodeResource, params: &SearchParams) -> Result<(), SkipReason> {
    if let Some(flag) = node
        .state
        .iter()
        .find(|s| !ALLOWED_STATES.contains(&s.as_str()))
    {
        return Err(SkipReason::State(flag.clone()));
    }

    // Also implied by the -1 ratio sentinel, but thresholds may be negative.
    if node.idle_gpus == 0 {
        return Err(SkipReason::NoIdleGpus);
    }

    if !params.gpu_type.is_match(&node.gpu_type) {
        return Err(SkipReason::GpuType(node.gpu_type.clone()));
    }

    if node.idle_cpu_per_gpu < params.min_cpu_per_gpu {
        return Err(SkipReason::CpuPerGpu(node.idle_cpu_per_gpu));
    }

    if node.idle_sys_mem_per_gpu_gb < params.min_sys_mem_per_gpu_gb {
        return Err(SkipReason::MemPerGpu(node.idle_sys_mem_per_gpu_gb));
    }

    if !node.partitions.iter().any(|p| params.partitions.accepts(p)) {
        return Err(SkipReason::NoAcceptedPartition);
    }

    Ok(())
}

/// Keep the nodes that satisfy every constraint.
///
/// Nodes are deduplicated by `(node_name, gpu_type)`; the first record wins.
pub fn filter_nodes(nodes: &[NodeResource], params: &SearchParams) -> BTreeSet<NodeResource> {
    let mut eligible = BTreeSet::new();
    for node in nodes {
        match check_node(node, params) {
            Ok(()) => {
                eligible.insert(node.clone());
            }
            Err(reason) => debug!(node = %node.node_name, %reason, "skipping node"),
        }
    }
    eligible
}
