//! Name matching for GPU types and partitions.

use regex::Regex;

/// Partition name fragments excluded when no partition filter is given.
pub const DEFAULT_EXCLUDED_PARTITIONS: [&str; 2] = ["full", "interactive"];

/// A regular expression anchored at the start of the name.
///
/// `a100` matches `a100` and `a100_80gb`; `.*` matches everything.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    /// `None` accepts every name.
    re: Option<Regex>,
}

impl Pattern {
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        let re = Regex::new(&format!("^(?:{source})"))?;
        Ok(Pattern {
            source: source.to_string(),
            re: Some(re),
        })
    }

    /// Pattern accepting every name.
    pub fn any() -> Self {
        Pattern {
            source: ".*".to_string(),
            re: None,
        }
    }

    pub fn is_match(&self, name: &str) -> bool {
        self.re.as_ref().is_none_or(|re| re.is_match(name))
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl Default for Pattern {
    fn default() -> Self {
        Pattern::any()
    }
}

/// Which partitions a node may be scheduled through.
#[derive(Debug, Clone)]
pub enum PartitionFilter {
    /// Accept partitions whose name contains none of these fragments.
    Exclude(Vec<String>),
    /// Accept partitions whose name matches the pattern.
    Matching(Pattern),
}

impl PartitionFilter {
    pub fn accepts(&self, partition: &str) -> bool {
        match self {
            PartitionFilter::Exclude(fragments) => {
                !fragments.iter().any(|f| partition.contains(f.as_str()))
            }
            PartitionFilter::Matching(pattern) => pattern.is_match(partition),
        }
    }
}

impl Default for PartitionFilter {
    fn default() -> Self {
        PartitionFilter::Exclude(
            DEFAULT_EXCLUDED_PARTITIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        )
    }
}
