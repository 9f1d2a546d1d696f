//! slurm-now allocation search.
//!
//! Turns a snapshot of heterogeneous nodes into a ranked list of
//! allocation shapes that could start right now. It does NOT submit jobs
//! or reserve anything: a shape reported here can be taken by someone else
//! before it is requested.
//!
//! # Components
//!
//! - **`params`**: Search constraints and their defaults
//! - **`filter`**: Per-node eligibility (state, ratios, GPU type, partitions)
//! - **`groups`**: Grouping by GPU type and per-node GPU threshold
//! - **`ranker`**: Ranking by achievable world size and the `search` entry points

pub mod error;
pub mod filter;
pub mod groups;
pub mod params;
pub mod ranker;

pub use error::SearchError;
pub use filter::{ALLOWED_STATES, SkipReason, check_node, filter_nodes};
pub use groups::{AllocationGroups, GroupKey, organize_groups};
pub use params::SearchParams;
pub use ranker::{rank_groups, run_search, search};
