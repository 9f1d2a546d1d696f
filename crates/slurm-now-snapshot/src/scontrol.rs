//! Live snapshots via `scontrol`.

use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, info};

use slurm_now_core::config::SnapshotConfig;

use crate::document::decode_document;
use crate::error::SnapshotError;
use crate::{SnapshotFuture, SnapshotReader};

pub const DEFAULT_PROGRAM: &str = "scontrol";
pub const DEFAULT_ARGS: [&str; 4] = ["show", "node", "--all", "--json"];
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Runs the node query as a subprocess and decodes its JSON output.
///
/// The child is killed if it outlives `timeout`.
#[derive(Debug, Clone)]
pub struct ScontrolReader {
    pub program: String,
    pub args: Vec<String>,
    pub timeout: Duration,
}

impl Default for ScontrolReader {
    fn default() -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            args: DEFAULT_ARGS.iter().map(|s| s.to_string()).collect(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ScontrolReader {
    pub fn from_config(config: &SnapshotConfig) -> Self {
        let defaults = Self::default();
        Self {
            program: config.command.clone().unwrap_or(defaults.program),
            args: config.args.clone().unwrap_or(defaults.args),
            timeout: config
                .timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
        }
    }

    async fn run(&self) -> Result<Vec<u8>, SnapshotError> {
        debug!(
            program = %self.program,
            args = ?self.args,
            timeout = ?self.timeout,
            "querying nodes"
        );

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).kill_on_drop(true);

        let output = tokio::time::timeout(self.timeout, cmd.output())
            .await
            .map_err(|_| SnapshotError::Timeout(self.timeout))?
            .map_err(|source| SnapshotError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(SnapshotError::ExitStatus {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        info!(bytes = output.stdout.len(), "received node snapshot");
        Ok(output.stdout)
    }
}

impl SnapshotReader for ScontrolReader {
    fn read_nodes(&self) -> SnapshotFuture<'_> {
        Box::pin(async move {
            let stdout = self.run().await?;
            decode_document(&stdout)
        })
    }
}
