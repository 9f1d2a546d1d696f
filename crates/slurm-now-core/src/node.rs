//! Node normalization: raw snapshot records to typed GPU availability.

use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};

use serde::Serialize;
use tracing::debug;

use crate::error::{NodeError, NodeResult};
use crate::gres::GresDescriptor;
use crate::types::NodeRecord;

/// Conversion factor from Slurm's MiB to decimal GB.
pub const MIB_TO_GB: f64 = (1u64 << 20) as f64 / 1e9;

/// Per-GPU ratio reported for nodes without idle GPUs. Below any
/// non-negative threshold.
pub const UNAVAILABLE_RATIO: f64 = -1.0;

/// The homogeneous set of idle GPUs on a single node.
///
/// Identity is `(node_name, gpu_type)`: equality, hashing and ordering
/// ignore the availability fields.
#[derive(Debug, Clone, Serialize)]
pub struct NodeResource {
    pub node_name: String,
    pub gpu_type: String,
    pub idle_gpus: u32,
    pub idle_cpu_per_gpu: f64,
    pub idle_sys_mem_per_gpu_gb: f64,
    pub state: BTreeSet<String>,
    pub partitions: BTreeSet<String>,
}

impl NodeResource {
    pub fn from_record(record: &NodeRecord) -> NodeResult<Self> {
        if record.name.is_empty() {
            return Err(NodeError::InvalidRecord("node has no name".to_string()));
        }

        let configured = parse_gres(&record.name, &record.gres)?;
        let used = parse_gres(&record.name, &record.gres_used)?;
        if configured.gpu_type != used.gpu_type {
            return Err(NodeError::MalformedResourceDescriptor {
                node: record.name.clone(),
                detail: format!(
                    "configured GPU type {:?} but in-use GPU type {:?}",
                    configured.gpu_type, used.gpu_type
                ),
            });
        }

        let idle_gpus = configured.count.checked_sub(used.count).ok_or_else(|| {
            NodeError::NegativeIdleResource {
                node: record.name.clone(),
                resource: "GPUs",
                total: i64::from(configured.count),
                used: i64::from(used.count),
            }
        })?;

        let idle_cpus = record
            .effective_cpus
            .checked_sub(record.alloc_cpus)
            .filter(|idle| *idle >= 0)
            .ok_or_else(|| NodeError::NegativeIdleResource {
                node: record.name.clone(),
                resource: "CPUs",
                total: record.effective_cpus,
                used: record.alloc_cpus,
            })?;

        let free_mem_gb = record.free_mem.number as f64 * MIB_TO_GB;
        let (idle_cpu_per_gpu, idle_sys_mem_per_gpu_gb) = if idle_gpus > 0 {
            let gpus = f64::from(idle_gpus);
            (idle_cpus as f64 / gpus, free_mem_gb / gpus)
        } else {
            (UNAVAILABLE_RATIO, UNAVAILABLE_RATIO)
        };

        Ok(NodeResource {
            node_name: record.name.clone(),
            gpu_type: configured.gpu_type,
            idle_gpus,
            idle_cpu_per_gpu,
            idle_sys_mem_per_gpu_gb,
            state: record.state.iter().cloned().collect(),
            partitions: record.partitions.iter().cloned().collect(),
        })
    }
}

fn parse_gres(node: &str, raw: &str) -> NodeResult<GresDescriptor> {
    GresDescriptor::parse(raw).map_err(|e| NodeError::MalformedResourceDescriptor {
        node: node.to_string(),
        detail: e.to_string(),
    })
}

impl PartialEq for NodeResource {
    fn eq(&self, other: &Self) -> bool {
        self.node_name == other.node_name && self.gpu_type == other.gpu_type
    }
}

impl Eq for NodeResource {}

impl Hash for NodeResource {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.node_name.hash(state);
        self.gpu_type.hash(state);
    }
}

impl PartialOrd for NodeResource {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for NodeResource {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (&self.node_name, &self.gpu_type).cmp(&(&other.node_name, &other.gpu_type))
    }
}

/// Normalize every record in a snapshot, dropping the ones that don't parse.
///
/// A bad record is logged at debug level with its raw content and never
/// hides the rest of the cluster.
pub fn normalize_all(records: &[NodeRecord]) -> Vec<NodeResource> {
    let mut nodes = Vec::with_capacity(records.len());
    for record in records {
        match NodeResource::from_record(record) {
            Ok(node) => nodes.push(node),
            Err(e) => debug!(error = %e, record = ?record, "dropping node record"),
        }
    }
    debug!(total = records.len(), usable = nodes.len(), "normalized snapshot");
    nodes
}
