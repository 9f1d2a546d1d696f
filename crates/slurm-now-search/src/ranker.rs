//! Ranking of allocation groups and the search entry points.
//!
//! Groups are ordered by GPU type, then achievable world size, then GPUs per
//! node, all descending. At equal world size the denser shape (fewer nodes)
//! comes first.

use std::collections::BTreeSet;

use slurm_now_core::{NodeResource, SearchResult, normalize_all};
use slurm_now_snapshot::SnapshotReader;
use tracing::{debug, info};

use crate::error::SearchError;
use crate::filter::filter_nodes;
use crate::groups::{AllocationGroups, GroupKey, organize_groups};
use crate::params::SearchParams;

fn world_size(key: &GroupKey, nodes: &BTreeSet<NodeResource>) -> u64 {
    u64::from(key.gpus_per_node) * nodes.len() as u64
}

/// Order groups best-first.
pub fn rank_groups(groups: AllocationGroups) -> Vec<(GroupKey, BTreeSet<NodeResource>)> {
    let mut ranked: Vec<_> = groups.into_iter().collect();
    ranked.sort_by(|(ka, na), (kb, nb)| {
        (&kb.gpu_type, world_size(kb, nb), kb.gpus_per_node).cmp(&(
            &ka.gpu_type,
            world_size(ka, na),
            ka.gpus_per_node,
        ))
    });
    ranked
}

/// Partitions every node in the group belongs to.
fn shared_partitions(nodes: &BTreeSet<NodeResource>) -> BTreeSet<String> {
    let mut iter = nodes.iter();
    let Some(first) = iter.next() else {
        return BTreeSet::new();
    };
    iter.fold(first.partitions.clone(), |acc, node| {
        acc.intersection(&node.partitions).cloned().collect()
    })
}

/// Search normalized nodes for allocation shapes of at least
/// `params.min_world_size` GPUs, best first.
///
/// Groups whose nodes share no partition are still reported, with an
/// empty partition set.
pub fn search(nodes: &[NodeResource], params: &SearchParams) -> Vec<SearchResult> {
    let eligible = filter_nodes(nodes, params);
    let groups = organize_groups(&eligible);
    let group_count = groups.len();

    let results: Vec<SearchResult> = rank_groups(groups)
        .into_iter()
        .filter(|(key, members)| world_size(key, members) >= params.min_world_size)
        .map(|(key, members)| SearchResult {
            world_size: world_size(&key, &members),
            partitions: shared_partitions(&members),
            gpu_type: key.gpu_type,
            gpus_per_node: key.gpus_per_node,
            nodes: members.into_iter().collect(),
        })
        .collect();

    debug!(
        nodes = nodes.len(),
        eligible = eligible.len(),
        groups = group_count,
        results = results.len(),
        min_world_size = params.min_world_size,
        "search complete"
    );
    results
}

/// Take a snapshot from `reader`, normalize it, and search it.
///
/// Only snapshot-level failures are errors; a cluster with nothing that
/// fits yields an empty list.
pub async fn run_search(
    reader: &dyn SnapshotReader,
    params: &SearchParams,
) -> Result<Vec<SearchResult>, SearchError> {
    let records = reader.read_nodes().await?;
    let nodes = normalize_all(&records);
    let results = search(&nodes, params);

    info!(
        records = records.len(),
        results = results.len(),
        best_world_size = results.iter().map(|r| r.world_size).max().unwrap_or(0),
        "allocation search finished"
    );
    Ok(results)
}
