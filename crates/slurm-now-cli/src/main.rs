//! slurm-now: find resource requests that can start on the cluster now.
//!
//! # Usage
//!
//! ```text
//! slurm-now --min-world-size 16 --gpu-type 'a100|h100' --min-cpu-per-gpu 8
//! ```

use std::path::PathBuf;

use clap::Parser;

mod report;
mod search;

#[derive(Parser, Debug)]
#[command(
    name = "slurm-now",
    about = "Query the Slurm cluster for resource configurations that will allow a job to start immediately",
    version
)]
pub struct Cli {
    /// The minimum world size (number of total GPUs) required [default: 1]
    #[arg(short = 'w', long)]
    pub min_world_size: Option<u64>,

    /// Regex limiting the search to matching GPU types [default: ^.*$]
    #[arg(short = 'g', long)]
    pub gpu_type: Option<String>,

    /// The minimum ratio of idle CPUs to idle GPUs required [default: 1.0]
    #[arg(short = 'c', long, allow_negative_numbers = true)]
    pub min_cpu_per_gpu: Option<f64>,

    /// The minimum idle system RAM per idle GPU, in GB [default: 0.1]
    #[arg(short = 'm', long = "min-sys-mem-per-gpu-gb", allow_negative_numbers = true)]
    pub min_sys_mem_per_gpu_gb: Option<f64>,

    /// Regex limiting the search to matching partitions.
    /// Without it, partitions containing "full" or "interactive" are skipped.
    #[arg(short = 'p', long)]
    pub partition_regex: Option<String>,

    /// Read a saved `scontrol show node --all --json` document instead of querying Slurm
    #[arg(long)]
    pub snapshot_file: Option<PathBuf>,

    /// Path to a slurm-now.toml config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output format: text or json
    #[arg(short, long, default_value = "text")]
    pub format: String,

    /// Show the nodes behind each result and debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let directive = if cli.verbose { "slurm_now=debug" } else { "slurm_now=warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(directive.parse()?),
        )
        .init();

    search::run(&cli).await
}
