//! Shared types used across slurm-now crates.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::node::NodeResource;

/// One node as reported by `scontrol show node --json`.
///
/// Only the fields the search needs are decoded; everything else in the
/// document is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub name: String,
    /// Configured GRES, e.g. `gpu:a100:8(S:0-1)`.
    #[serde(default)]
    pub gres: String,
    /// GRES currently allocated, e.g. `gpu:a100:2(IDX:0-1)`.
    #[serde(default)]
    pub gres_used: String,
    pub effective_cpus: i64,
    pub alloc_cpus: i64,
    pub free_mem: FreeMemory,
    #[serde(default)]
    pub state: Vec<String>,
    #[serde(default)]
    pub partitions: Vec<String>,
}

/// Slurm's numeric wrapper for free memory, in MiB.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FreeMemory {
    pub number: u64,
}

/// One achievable allocation shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub gpu_type: String,
    /// Idle GPUs every contributing node can supply.
    pub gpus_per_node: u32,
    /// `gpus_per_node × nodes.len()`.
    pub world_size: u64,
    /// Contributing nodes, ordered by name.
    pub nodes: Vec<NodeResource>,
    /// Partitions shared by every contributing node. May be empty.
    pub partitions: BTreeSet<String>,
}

impl SearchResult {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Smallest idle CPU-per-GPU ratio across the contributing nodes.
    pub fn min_cpu_per_gpu(&self) -> f64 {
        self.nodes
            .iter()
            .map(|n| n.idle_cpu_per_gpu)
            .fold(f64::INFINITY, f64::min)
    }

    /// Smallest idle memory-per-GPU (GB) across the contributing nodes.
    pub fn min_sys_mem_per_gpu_gb(&self) -> f64 {
        self.nodes
            .iter()
            .map(|n| n.idle_sys_mem_per_gpu_gb)
            .fold(f64::INFINITY, f64::min)
    }
}
