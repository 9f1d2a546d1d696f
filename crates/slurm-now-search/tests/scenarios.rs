//! End-to-end searches over saved snapshots: document -> normalizer -> search.

use std::io::Write;

use serde_json::{Value, json};
use slurm_now_core::{PartitionFilter, Pattern, SearchResult};
use slurm_now_search::{SearchError, SearchParams, run_search};
use slurm_now_snapshot::FileReader;

#[allow(clippy::too_many_arguments)]
fn node(
    name: &str,
    gpu_type: &str,
    total: u32,
    used: u32,
    cpus: i64,
    free_mib: u64,
    state: &[&str],
    partitions: &[&str],
) -> Value {
    json!({
        "name": name,
        "gres": format!("gpu:{gpu_type}:{total}(S:0-1)"),
        "gres_used": format!("gpu:{gpu_type}:{used}(IDX:N/A)"),
        "effective_cpus": cpus,
        "alloc_cpus": 0,
        "free_mem": { "set": true, "infinite": false, "number": free_mib },
        "state": state,
        "partitions": partitions,
    })
}

fn idle_node(name: &str, gpu_type: &str, idle: u32) -> Value {
    node(
        name,
        gpu_type,
        idle,
        0,
        i64::from(idle) * 4,
        u64::from(idle) * 40_000,
        &["IDLE"],
        &["batch"],
    )
}

fn snapshot(nodes: Vec<Value>) -> tempfile::NamedTempFile {
    let doc = json!({ "nodes": nodes, "errors": [] });
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(doc.to_string().as_bytes()).unwrap();
    file
}

async fn search_file(file: &tempfile::NamedTempFile, params: &SearchParams) -> Vec<SearchResult> {
    run_search(&FileReader::new(file.path()), params).await.unwrap()
}

fn node_names(result: &SearchResult) -> Vec<&str> {
    result.nodes.iter().map(|n| n.node_name.as_str()).collect()
}

#[tokio::test]
async fn two_idle_nodes_prefer_single_dense_node() {
    let file = snapshot(vec![
        node("gpu01", "A100", 4, 0, 8, 40_000, &["IDLE"], &["batch"]),
        node("gpu02", "A100", 8, 0, 16, 80_000, &["IDLE"], &["batch"]),
    ]);
    let params = SearchParams {
        min_world_size: 8,
        ..SearchParams::default()
    };
    let results = search_file(&file, &params).await;

    assert_eq!(results.len(), 2);
    assert_eq!((results[0].gpus_per_node, results[0].world_size), (8, 8));
    assert_eq!(node_names(&results[0]), vec!["gpu02"]);
    assert_eq!((results[1].gpus_per_node, results[1].world_size), (4, 8));
    assert_eq!(node_names(&results[1]), vec!["gpu01", "gpu02"]);
    assert_eq!(results[1].min_cpu_per_gpu(), 2.0);
}

#[tokio::test]
async fn draining_node_never_appears() {
    let file = snapshot(vec![
        node("gpu01", "a100", 8, 0, 64, 800_000, &["IDLE", "DRAIN"], &["batch"]),
        idle_node("gpu02", "a100", 4),
    ]);
    let lenient = SearchParams {
        min_cpu_per_gpu: 0.0,
        min_sys_mem_per_gpu_gb: 0.0,
        partitions: PartitionFilter::Matching(Pattern::any()),
        ..SearchParams::default()
    };

    for params in [SearchParams::default(), lenient] {
        let results = search_file(&file, &params).await;
        assert!(!results.is_empty());
        for result in &results {
            assert!(result.nodes.iter().all(|n| n.node_name != "gpu01"));
        }
    }
}

#[tokio::test]
async fn malformed_node_does_not_hide_the_cluster() {
    let mut nodes: Vec<Value> = (1..=4)
        .map(|i| idle_node(&format!("gpu0{i}"), "a100", 4))
        .collect();
    let mut bad = idle_node("gpu05", "a100", 4);
    bad["gres"] = json!("gpu:8");
    nodes.insert(2, bad);
    let file = snapshot(nodes);

    let results = search_file(&file, &SearchParams::default()).await;

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].world_size, 16);
    assert_eq!(node_names(&results[0]), vec!["gpu01", "gpu02", "gpu03", "gpu04"]);
}

#[tokio::test]
async fn interactive_partition_needs_explicit_pattern() {
    let file = snapshot(vec![node(
        "gpu01", "a100", 4, 0, 16, 160_000, &["IDLE"], &["interactive-debug"],
    )]);

    assert!(search_file(&file, &SearchParams::default()).await.is_empty());

    let params = SearchParams {
        partitions: PartitionFilter::Matching(Pattern::new("interactive.*").unwrap()),
        ..SearchParams::default()
    };
    let results = search_file(&file, &params).await;
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].partitions.iter().collect::<Vec<_>>(), vec!["interactive-debug"]);
}

#[tokio::test]
async fn unreachable_world_size_is_empty_not_error() {
    let nodes: Vec<Value> = (0..8).map(|i| idle_node(&format!("gpu{i:02}"), "h100", 8)).collect();
    let file = snapshot(nodes);

    let all = search_file(&file, &SearchParams::default()).await;
    assert_eq!(all.iter().map(|r| r.world_size).max(), Some(64));

    let params = SearchParams {
        min_world_size: 1000,
        ..SearchParams::default()
    };
    assert!(search_file(&file, &params).await.is_empty());
}

#[tokio::test]
async fn fully_allocated_nodes_are_excluded() {
    let file = snapshot(vec![
        node("gpu01", "a100", 8, 8, 64, 100_000, &["MIXED"], &["batch"]),
        idle_node("gpu02", "a100", 2),
    ]);
    let params = SearchParams {
        min_cpu_per_gpu: -5.0,
        min_sys_mem_per_gpu_gb: -5.0,
        ..SearchParams::default()
    };
    let results = search_file(&file, &params).await;

    assert_eq!(results.len(), 1);
    assert_eq!(node_names(&results[0]), vec!["gpu02"]);
}

#[tokio::test]
async fn results_are_ranked_and_repeatable() {
    let file = snapshot(vec![
        idle_node("a01", "a100", 8),
        idle_node("a02", "a100", 4),
        idle_node("a03", "a100", 2),
        idle_node("a04", "a100", 4),
        idle_node("h01", "h100", 8),
        idle_node("h02", "h100", 1),
        node("v01", "v100", 4, 1, 12, 120_000, &["MIXED"], &["batch", "long"]),
    ]);
    let params = SearchParams::default();

    let first = search_file(&file, &params).await;
    let second = search_file(&file, &params).await;
    assert_eq!(first, second);

    let keys: Vec<(&str, u64, u32)> = first
        .iter()
        .map(|r| (r.gpu_type.as_str(), r.world_size, r.gpus_per_node))
        .collect();
    for pair in keys.windows(2) {
        assert!(pair[0] >= pair[1], "{:?} ranked above {:?}", pair[0], pair[1]);
    }

    for result in &first {
        assert_eq!(result.world_size, u64::from(result.gpus_per_node) * result.node_count() as u64);
        for n in &result.nodes {
            assert_eq!(n.gpu_type, result.gpu_type);
            assert!(n.idle_gpus >= result.gpus_per_node);
            assert!(n.state.iter().all(|s| s == "IDLE" || s == "MIXED"));
            assert!(n.idle_cpu_per_gpu >= params.min_cpu_per_gpu);
            assert!(n.idle_sys_mem_per_gpu_gb >= params.min_sys_mem_per_gpu_gb);
        }
    }
}

#[tokio::test]
async fn snapshot_failure_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let reader = FileReader::new(dir.path().join("missing.json"));

    assert!(matches!(
        run_search(&reader, &SearchParams::default()).await,
        Err(SearchError::SnapshotUnavailable(_))
    ));
}
