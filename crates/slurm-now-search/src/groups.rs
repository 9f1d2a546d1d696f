//! Grouping of eligible nodes into homogeneous allocation groups.
//!
//! For each GPU type, every distinct idle-GPU count seen on a node of that
//! type becomes a candidate threshold. A node joins every group of its own
//! type whose threshold it can meet, so an 8-idle node also backs the 4
//! and 2 GPUs-per-node shapes when those counts occur in the cluster.

use std::collections::{BTreeMap, BTreeSet};

use slurm_now_core::NodeResource;
use tracing::debug;

/// `(gpu_type, gpus_per_node)` identifying one allocation group.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupKey {
    pub gpu_type: String,
    pub gpus_per_node: u32,
}

impl GroupKey {
    pub fn new(gpu_type: &str, gpus_per_node: u32) -> Self {
        Self {
            gpu_type: gpu_type.to_string(),
            gpus_per_node,
        }
    }
}

/// Every group with the nodes able to supply its per-node GPU count.
pub type AllocationGroups = BTreeMap<GroupKey, BTreeSet<NodeResource>>;

pub fn organize_groups(nodes: &BTreeSet<NodeResource>) -> AllocationGroups {
    let mut thresholds: BTreeMap<&str, BTreeSet<u32>> = BTreeMap::new();
    for node in nodes {
        thresholds
            .entry(node.gpu_type.as_str())
            .or_default()
            .insert(node.idle_gpus);
    }
    debug!(?thresholds, "candidate GPUs-per-node thresholds");

    let mut groups = AllocationGroups::new();
    for node in nodes {
        let Some(candidates) = thresholds.get(node.gpu_type.as_str()) else {
            continue;
        };
        for &min in candidates.range(..=node.idle_gpus) {
            groups
                .entry(GroupKey::new(&node.gpu_type, min))
                .or_default()
                .insert(node.clone());
        }
    }
    groups
}
