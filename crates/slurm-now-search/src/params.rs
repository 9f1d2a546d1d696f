//! Search constraints.

use slurm_now_core::config::SearchConfig;
use slurm_now_core::{ConfigResult, PartitionFilter, Pattern};

pub const DEFAULT_MIN_WORLD_SIZE: u64 = 1;
pub const DEFAULT_MIN_CPU_PER_GPU: f64 = 1.0;
pub const DEFAULT_MIN_SYS_MEM_PER_GPU_GB: f64 = 0.1;

/// Constraints for one search.
#[derive(Debug, Clone)]
pub struct SearchParams {
    /// Smallest total GPU count worth reporting.
    pub min_world_size: u64,
    /// GPU types to consider.
    pub gpu_type: Pattern,
    /// Minimum idle CPUs per idle GPU on every node.
    pub min_cpu_per_gpu: f64,
    /// Minimum idle system memory (GB) per idle GPU on every node.
    pub min_sys_mem_per_gpu_gb: f64,
    /// Partitions a node must be reachable through.
    pub partitions: PartitionFilter,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            min_world_size: DEFAULT_MIN_WORLD_SIZE,
            gpu_type: Pattern::any(),
            min_cpu_per_gpu: DEFAULT_MIN_CPU_PER_GPU,
            min_sys_mem_per_gpu_gb: DEFAULT_MIN_SYS_MEM_PER_GPU_GB,
            partitions: PartitionFilter::default(),
        }
    }
}

impl SearchParams {
    /// Defaults overlaid with whatever the `[search]` table sets.
    pub fn from_config(config: &SearchConfig) -> ConfigResult<Self> {
        let defaults = Self::default();
        Ok(Self {
            min_world_size: config.min_world_size.unwrap_or(defaults.min_world_size),
            gpu_type: config.gpu_type_pattern()?.unwrap_or(defaults.gpu_type),
            min_cpu_per_gpu: config.min_cpu_per_gpu.unwrap_or(defaults.min_cpu_per_gpu),
            min_sys_mem_per_gpu_gb: config
                .min_sys_mem_per_gpu_gb
                .unwrap_or(defaults.min_sys_mem_per_gpu_gb),
            partitions: config.partition_filter()?.unwrap_or(defaults.partitions),
        })
    }
}
