//! GRES (generic resource) descriptor parsing.
//!
//! Slurm reports GPU accounting as strings like `gpu:a100:8(S:0-1)` for the
//! configured resources and `gpu:a100:3(IDX:0-2)` for the ones in use.
//! Only the leading `category:type:count` triple is meaningful here.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

static GRES_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<category>\w+):(?P<type>\w+):(?P<count>\d+)")
        .expect("GRES pattern is valid")
});

#[derive(Debug, Error)]
pub enum GresError {
    #[error("descriptor does not match category:type:count: {0:?}")]
    NoMatch(String),
    #[error("count out of range in descriptor: {0:?}")]
    Count(String),
}

/// A parsed `category:type:count` GRES triple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GresDescriptor {
    pub category: String,
    pub gpu_type: String,
    pub count: u32,
}

impl GresDescriptor {
    pub fn parse(raw: &str) -> Result<Self, GresError> {
        let caps = GRES_RE
            .captures(raw)
            .ok_or_else(|| GresError::NoMatch(raw.to_string()))?;

        let count = caps["count"]
            .parse::<u32>()
            .map_err(|_| GresError::Count(raw.to_string()))?;

        Ok(GresDescriptor {
            category: caps["category"].to_string(),
            gpu_type: caps["type"].to_string(),
            count,
        })
    }
}
