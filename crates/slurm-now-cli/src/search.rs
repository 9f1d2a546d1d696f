use anyhow::Context;
use slurm_now_core::config::SearchConfig;
use slurm_now_core::{NowConfig, PartitionFilter, Pattern};
use slurm_now_search::{SearchParams, run_search};
use slurm_now_snapshot::{FileReader, ScontrolReader};
use tracing::info;

use crate::Cli;
use crate::report;

pub async fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => {
            info!(path = %path.display(), "loading config");
            NowConfig::from_file(path)?
        }
        None => NowConfig::default(),
    };
    let params = build_params(cli, &config.search())?;
    info!(
        min_world_size = params.min_world_size,
        gpu_type = params.gpu_type.as_str(),
        min_cpu_per_gpu = params.min_cpu_per_gpu,
        min_sys_mem_per_gpu_gb = params.min_sys_mem_per_gpu_gb,
        partitions = ?params.partitions,
        "searching for allocations"
    );

    let results = match &cli.snapshot_file {
        Some(path) => {
            info!(path = %path.display(), "reading saved snapshot");
            run_search(&FileReader::new(path), &params).await?
        }
        None => {
            let reader = ScontrolReader::from_config(&config.snapshot());
            info!(program = %reader.program, timeout = ?reader.timeout, "querying scontrol");
            run_search(&reader, &params).await?
        }
    };

    match cli.format.as_str() {
        "json" => {
            println!("{}", report::format_json(&results)?);
        }
        _ => {
            print!("{}", report::format_text(&results, cli.verbose));
        }
    }

    Ok(())
}

/// Flags win over the config file, which wins over the defaults.
fn build_params(cli: &Cli, config: &SearchConfig) -> anyhow::Result<SearchParams> {
    let mut params = SearchParams::from_config(config)?;

    if let Some(min) = cli.min_world_size {
        params.min_world_size = min;
    }
    if let Some(gpu_type) = &cli.gpu_type {
        params.gpu_type = Pattern::new(gpu_type)
            .with_context(|| format!("invalid --gpu-type pattern {gpu_type:?}"))?;
    }
    if let Some(min) = cli.min_cpu_per_gpu {
        params.min_cpu_per_gpu = min;
    }
    if let Some(min) = cli.min_sys_mem_per_gpu_gb {
        params.min_sys_mem_per_gpu_gb = min;
    }
    if let Some(regex) = &cli.partition_regex {
        let pattern = Pattern::new(regex)
            .with_context(|| format!("invalid --partition-regex pattern {regex:?}"))?;
        params.partitions = PartitionFilter::Matching(pattern);
    }

    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("slurm-now").chain(args.iter().copied()))
    }

    #[test]
    fn defaults_without_flags_or_config() {
        let params = build_params(&cli(&[]), &SearchConfig::default()).unwrap();
        assert_eq!(params.min_world_size, 1);
        assert_eq!(params.min_cpu_per_gpu, 1.0);
        assert_eq!(params.min_sys_mem_per_gpu_gb, 0.1);
        assert!(params.partitions.accepts("batch"));
        assert!(!params.partitions.accepts("interactive"));
    }

    #[test]
    fn flags_override_config() {
        let config = SearchConfig {
            min_world_size: Some(32),
            min_cpu_per_gpu: Some(8.0),
            exclude_partitions: Some(vec!["preempt".to_string()]),
            ..SearchConfig::default()
        };
        let args = cli(&["-w", "64", "-p", "interactive.*"]);
        let params = build_params(&args, &config).unwrap();

        assert_eq!(params.min_world_size, 64);
        assert_eq!(params.min_cpu_per_gpu, 8.0);
        assert!(params.partitions.accepts("interactive-debug"));
        assert!(!params.partitions.accepts("batch"));
    }

    #[test]
    fn config_applies_when_flag_absent() {
        let config = SearchConfig {
            exclude_partitions: Some(vec!["preempt".to_string()]),
            ..SearchConfig::default()
        };
        let params = build_params(&cli(&["-g", "h100"]), &config).unwrap();

        assert!(params.partitions.accepts("interactive"));
        assert!(!params.partitions.accepts("preempt_gpu"));
        assert_eq!(params.gpu_type.as_str(), "h100");
        assert!(params.gpu_type.is_match("h100"));
        assert!(!params.gpu_type.is_match("a100"));
    }

    #[test]
    fn invalid_pattern_is_reported() {
        let err = build_params(&cli(&["-g", "(a100"]), &SearchConfig::default()).unwrap_err();
        assert!(err.to_string().contains("--gpu-type"));
    }

    #[test]
    fn negative_thresholds_parse() {
        let args = cli(&["-c", "-1", "-m", "-0.5"]);
        let params = build_params(&args, &SearchConfig::default()).unwrap();
        assert_eq!(params.min_cpu_per_gpu, -1.0);
        assert_eq!(params.min_sys_mem_per_gpu_gb, -0.5);
    }

    #[tokio::test]
    async fn run_against_saved_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nodes.json");
        std::fs::write(
            &path,
            r#"{"nodes": [{"name": "gpu01", "gres": "gpu:a100:4", "gres_used": "gpu:a100:0",
                "effective_cpus": 32, "alloc_cpus": 0, "free_mem": {"number": 200000},
                "state": ["IDLE"], "partitions": ["batch"]}], "errors": []}"#,
        )
        .unwrap();

        let args = cli(&["--snapshot-file", path.to_str().unwrap(), "--format", "json"]);
        run(&args).await.unwrap();
    }
}
