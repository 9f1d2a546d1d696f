//! slurm-now.toml configuration parser.
//!
//! Every field is optional. Command-line flags override whatever the file
//! sets, and anything left unset falls back to the built-in defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ConfigError, ConfigResult};
use crate::pattern::{PartitionFilter, Pattern};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NowConfig {
    pub search: Option<SearchConfig>,
    pub snapshot: Option<SnapshotConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchConfig {
    pub min_world_size: Option<u64>,
    pub gpu_type: Option<String>,
    pub min_cpu_per_gpu: Option<f64>,
    pub min_sys_mem_per_gpu_gb: Option<f64>,
    pub partition_regex: Option<String>,
    pub exclude_partitions: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotConfig {
    pub command: Option<String>,
    pub args: Option<Vec<String>>,
    pub timeout_secs: Option<u64>,
}

impl NowConfig {
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> ConfigResult<Self> {
        let config: NowConfig = toml::from_str(content)?;
        if let Some(search) = &config.search {
            if search.partition_regex.is_some() && search.exclude_partitions.is_some() {
                return Err(ConfigError::ConflictingPartitionFilters);
            }
        }
        Ok(config)
    }

    pub fn search(&self) -> SearchConfig {
        self.search.clone().unwrap_or_default()
    }

    pub fn snapshot(&self) -> SnapshotConfig {
        self.snapshot.clone().unwrap_or_default()
    }
}

impl SearchConfig {
    pub fn gpu_type_pattern(&self) -> ConfigResult<Option<Pattern>> {
        self.gpu_type.as_deref().map(compile).transpose()
    }

    pub fn partition_filter(&self) -> ConfigResult<Option<PartitionFilter>> {
        if let Some(regex) = &self.partition_regex {
            return Ok(Some(PartitionFilter::Matching(compile(regex)?)));
        }
        Ok(self
            .exclude_partitions
            .as_ref()
            .map(|fragments| PartitionFilter::Exclude(fragments.clone())))
    }
}

fn compile(pattern: &str) -> ConfigResult<Pattern> {
    Pattern::new(pattern).map_err(|source| ConfigError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}
