//! Rendering of search results as resource-request recipes.

use comfy_table::{Cell, ContentArrangement, Table, presets::UTF8_FULL};
use serde::Serialize;
use slurm_now_core::{NodeResource, SearchResult};

/// The request that reproduces one search result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceRequest {
    pub world_size: u64,
    pub nodes: usize,
    pub ntasks_per_node: u32,
    pub gpu_type: String,
    pub gpus_per_node: u32,
    /// Smallest idle CPU-per-GPU ratio in the group, rounded.
    pub cpus_per_task: u64,
    /// Smallest idle memory-per-GPU in the group, rounded GB.
    pub mem_per_gpu_gb: u64,
    pub partitions: Vec<String>,
}

impl ResourceRequest {
    pub fn from_result(result: &SearchResult) -> Self {
        ResourceRequest {
            world_size: result.world_size,
            nodes: result.node_count(),
            ntasks_per_node: result.gpus_per_node,
            gpu_type: result.gpu_type.clone(),
            gpus_per_node: result.gpus_per_node,
            cpus_per_task: round_ratio(result.min_cpu_per_gpu()),
            mem_per_gpu_gb: round_ratio(result.min_sys_mem_per_gpu_gb()),
            partitions: result.partitions.iter().cloned().collect(),
        }
    }

    /// `sbatch`/`srun` options for this request.
    pub fn sbatch_args(&self) -> String {
        format!(
            "--nodes={} --ntasks-per-node={} --gpus-per-node={}:{} --cpus-per-task={} --mem-per-gpu={}G --partition={}",
            self.nodes,
            self.ntasks_per_node,
            self.gpu_type,
            self.gpus_per_node,
            self.cpus_per_task,
            self.mem_per_gpu_gb,
            self.partitions.join(","),
        )
    }
}

// Halves round to even.
fn round_ratio(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value.round_ties_even() as u64
    } else {
        0
    }
}

pub fn format_text(results: &[SearchResult], verbose: bool) -> String {
    let mut out = String::new();

    for result in results {
        let request = ResourceRequest::from_result(result);
        out.push_str(&format!(
            "Achieve up to world size {} using {}\n",
            request.world_size,
            request.sbatch_args()
        ));
        if verbose {
            out.push_str(&node_table(&result.nodes).to_string());
            out.push('\n');
        }
    }

    out
}

pub fn node_table(nodes: &[NodeResource]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Node"),
            Cell::new("GPU type"),
            Cell::new("Idle GPUs"),
            Cell::new("CPUs/GPU"),
            Cell::new("GB/GPU"),
            Cell::new("State"),
            Cell::new("Partitions"),
        ]);

    for node in nodes {
        table.add_row(vec![
            Cell::new(&node.node_name),
            Cell::new(&node.gpu_type),
            Cell::new(node.idle_gpus),
            Cell::new(format!("{:.2}", node.idle_cpu_per_gpu)),
            Cell::new(format!("{:.1}", node.idle_sys_mem_per_gpu_gb)),
            Cell::new(join(&node.state)),
            Cell::new(join(&node.partitions)),
        ]);
    }

    table
}

fn join<'a>(items: impl IntoIterator<Item = &'a String>) -> String {
    items.into_iter().map(String::as_str).collect::<Vec<_>>().join(",")
}

#[derive(Serialize)]
struct ResultView<'a> {
    #[serde(flatten)]
    request: ResourceRequest,
    node_details: &'a [NodeResource],
}

pub fn format_json(results: &[SearchResult]) -> serde_json::Result<String> {
    let views: Vec<ResultView<'_>> = results
        .iter()
        .map(|r| ResultView {
            request: ResourceRequest::from_result(r),
            node_details: &r.nodes,
        })
        .collect();
    serde_json::to_string_pretty(&views)
}
