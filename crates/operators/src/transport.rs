// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cluster transports: the thing a [`crate::compute::ComputeOperator`]
//! drives to actually run a submitted command somewhere.
//!
//! Both implementations shell out to real CLI binaries (`sh`, `ssh`,
//! `sbatch`, `squeue`, `scancel`, `rsync`) via `tokio::process::Command`
//! rather than speaking any scheduler or transport protocol directly.

use crate::error::OperatorError;
use async_trait::async_trait;
use ms_core::ExternalStatus;
use std::path::PathBuf;
use std::time::Duration;
use tokio::process::Command;

/// Default timeout for a submission call (sbatch/local spawn).
pub const SUBMIT_TIMEOUT: Duration = Duration::from_secs(30);
/// Default timeout for a status query (squeue/sacct/local probe).
pub const QUERY_TIMEOUT: Duration = Duration::from_secs(20);
/// Default timeout for a cancel call (scancel/local kill).
pub const CANCEL_TIMEOUT: Duration = Duration::from_secs(15);
/// Default timeout for staging inputs or fetching outputs (rsync).
pub const TRANSFER_TIMEOUT: Duration = Duration::from_secs(120);

/// Run a subprocess with a timeout, converting timeout expiration into a
/// descriptive transient error. The child is killed on timeout via the
/// tokio `Child` drop implementation.
pub async fn run_with_timeout(
    mut cmd: Command,
    timeout: Duration,
    description: &str,
) -> Result<std::process::Output, OperatorError> {
    match tokio::time::timeout(timeout, cmd.output()).await {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(io_err)) => Err(OperatorError::Transient(format!(
            "{description} failed: {io_err}"
        ))),
        Err(_elapsed) => Err(OperatorError::Transient(format!(
            "{description} timed out after {}s",
            timeout.as_secs()
        ))),
    }
}

/// The two coordinates an attempt's working directory has: where it lives
/// on the local filesystem (always, under the run root) and, for remote
/// backends, where it lives relative to the backend's own root.
#[derive(Debug, Clone)]
pub struct WorkDir {
    pub local: PathBuf,
    pub remote_relative: PathBuf,
}

/// The backend a [`crate::compute::ComputeOperator`] submits work through.
/// Implementations map whatever status vocabulary the backend speaks onto
/// [`ExternalStatus`] before the engine ever sees it.
#[async_trait]
pub trait ClusterTransport: Send + Sync {
    /// Push whatever `local` already contains (manifest, submit script,
    /// config snapshot) to wherever the backend will actually run it.
    /// A no-op for backends that execute in place.
    async fn stage(&self, workdir: &WorkDir) -> Result<(), OperatorError>;

    /// Submit the staged `submit.sh` for execution, returning a
    /// backend-issued external id (a PID, a Slurm job id).
    async fn submit(&self, workdir: &WorkDir) -> Result<String, OperatorError>;

    /// Query current status for a previously-submitted external id.
    async fn query_status(&self, external_id: &str, workdir: &WorkDir) -> Result<ExternalStatus, OperatorError>;

    /// Best-effort termination request.
    async fn cancel(&self, external_id: &str) -> Result<(), OperatorError>;

    /// Copy outputs back into `workdir.local`. A no-op for backends that
    /// already wrote there directly.
    async fn fetch_outputs(&self, workdir: &WorkDir) -> Result<(), OperatorError>;
}

/// Runs `submit.sh` as a detached local subprocess. The script itself is
/// responsible for redirecting stdout/stderr and writing an `exit_code`
/// marker file on completion (see [`crate::compute::write_submit_script`]);
/// this transport only spawns it and probes that marker.
#[derive(Debug, Clone, Default)]
pub struct LocalProcessTransport;

impl LocalProcessTransport {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ClusterTransport for LocalProcessTransport {
    async fn stage(&self, _workdir: &WorkDir) -> Result<(), OperatorError> {
        Ok(())
    }

    async fn submit(&self, workdir: &WorkDir) -> Result<String, OperatorError> {
        let child = Command::new("sh")
            .arg("submit.sh")
            .current_dir(&workdir.local)
            .kill_on_drop(false)
            .spawn()
            .map_err(|e| OperatorError::Transient(format!("local spawn failed: {e}")))?;
        let pid = child.id().ok_or_else(|| {
            OperatorError::Transient("local process exited before PID was observable".to_string())
        })?;
        // Detach: completion is observed via the exit_code marker file, not
        // by awaiting this handle across ticks.
        std::mem::drop(child);
        Ok(pid.to_string())
    }

    async fn query_status(&self, external_id: &str, workdir: &WorkDir) -> Result<ExternalStatus, OperatorError> {
        let marker = workdir.local.join("exit_code");
        if marker.exists() {
            let contents = tokio::fs::read_to_string(&marker)
                .await
                .map_err(|e| OperatorError::Transient(format!("reading exit_code: {e}")))?;
            return Ok(match contents.trim().parse::<i32>() {
                Ok(0) => ExternalStatus::Succeeded,
                Ok(_) => ExternalStatus::Failed,
                Err(_) => ExternalStatus::Unknown,
            });
        }
        if process_alive(external_id) {
            Ok(ExternalStatus::Pending)
        } else {
            Ok(ExternalStatus::Unknown)
        }
    }

    async fn cancel(&self, external_id: &str) -> Result<(), OperatorError> {
        let output = Command::new("kill")
            .arg("-TERM")
            .arg(external_id)
            .output()
            .await
            .map_err(|e| OperatorError::Transient(format!("kill failed: {e}")))?;
        if !output.status.success() {
            tracing::debug!(external_id, "kill reported failure (process likely already gone)");
        }
        Ok(())
    }

    async fn fetch_outputs(&self, _workdir: &WorkDir) -> Result<(), OperatorError> {
        // submit.sh already writes directly into the evidence directory.
        Ok(())
    }
}

fn process_alive(pid: &str) -> bool {
    std::process::Command::new("kill")
        .arg("-0")
        .arg(pid)
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Stages via `rsync`, submits via `ssh <host> sbatch submit.sh`, and polls
/// via `squeue`/`sacct`, all reached over the same SSH host. Never speaks
/// the Slurm REST API or an SSH protocol library directly — always the
/// site's own CLI binaries.
#[derive(Debug, Clone)]
pub struct SshSlurmTransport {
    pub host: String,
    pub remote_workdir_root: String,
}

impl SshSlurmTransport {
    pub fn new(host: impl Into<String>, remote_workdir_root: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            remote_workdir_root: remote_workdir_root.into(),
        }
    }

    fn ssh(&self) -> Command {
        let mut cmd = Command::new("ssh");
        cmd.arg(&self.host);
        cmd
    }

    fn remote_dir(&self, workdir: &WorkDir) -> String {
        format!("{}/{}", self.remote_workdir_root, workdir.remote_relative.display())
    }
}

#[async_trait]
impl ClusterTransport for SshSlurmTransport {
    async fn stage(&self, workdir: &WorkDir) -> Result<(), OperatorError> {
        let remote_dir = self.remote_dir(workdir);
        let mkdir_cmd = {
            let mut cmd = self.ssh();
            cmd.arg(format!("mkdir -p {remote_dir}"));
            cmd
        };
        run_with_timeout(mkdir_cmd, SUBMIT_TIMEOUT, "ssh mkdir -p").await?;

        let mut cmd = Command::new("rsync");
        cmd.arg("-a")
            .arg(format!("{}/", workdir.local.display()))
            .arg(format!("{}:{remote_dir}/", self.host));
        let output = run_with_timeout(cmd, TRANSFER_TIMEOUT, "rsync stage").await?;
        if !output.status.success() {
            return Err(OperatorError::Transient(format!(
                "rsync stage exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr)
            )));
        }
        Ok(())
    }

    async fn submit(&self, workdir: &WorkDir) -> Result<String, OperatorError> {
        let remote_dir = self.remote_dir(workdir);
        let mut cmd = self.ssh();
        cmd.arg(format!("cd {remote_dir} && sbatch submit.sh"));
        let output = run_with_timeout(cmd, SUBMIT_TIMEOUT, "sbatch").await?;
        if !output.status.success() {
            return Err(OperatorError::Transient(format!(
                "sbatch exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr)
            )));
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        stdout
            .split_whitespace()
            .last()
            .map(|s| s.to_string())
            .ok_or_else(|| {
                OperatorError::ManifestValidation(format!(
                    "could not parse job id from sbatch output: {stdout}"
                ))
            })
    }

    async fn query_status(&self, external_id: &str, _workdir: &WorkDir) -> Result<ExternalStatus, OperatorError> {
        let mut cmd = self.ssh();
        cmd.arg(format!(
            "squeue -j {external_id} -h -o %T || sacct -j {external_id} --noheader --format=State -X"
        ));
        let output = run_with_timeout(cmd, QUERY_TIMEOUT, "squeue/sacct").await?;
        if !output.status.success() {
            return Ok(ExternalStatus::Unreachable);
        }
        let state = String::from_utf8_lossy(&output.stdout).trim().to_uppercase();
        Ok(map_slurm_state(&state))
    }

    async fn cancel(&self, external_id: &str) -> Result<(), OperatorError> {
        let mut cmd = self.ssh();
        cmd.arg(format!("scancel {external_id}"));
        run_with_timeout(cmd, CANCEL_TIMEOUT, "scancel").await?;
        Ok(())
    }

    async fn fetch_outputs(&self, workdir: &WorkDir) -> Result<(), OperatorError> {
        let remote_dir = self.remote_dir(workdir);
        tokio::fs::create_dir_all(&workdir.local)
            .await
            .map_err(OperatorError::Io)?;
        let mut cmd = Command::new("rsync");
        cmd.arg("-a")
            .arg(format!("{}:{remote_dir}/", self.host))
            .arg(format!("{}/", workdir.local.display()));
        let output = run_with_timeout(cmd, TRANSFER_TIMEOUT, "rsync fetch").await?;
        if !output.status.success() {
            return Err(OperatorError::Transient(format!(
                "rsync fetch exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr)
            )));
        }
        Ok(())
    }
}

/// Maps a Slurm job state string onto [`ExternalStatus`] per the decision
/// table: anything not listed here is treated as a retryable transient
/// condition, never a silent terminal outcome.
fn map_slurm_state(state: &str) -> ExternalStatus {
    match state {
        "" => ExternalStatus::Unknown,
        "PENDING" | "RUNNING" | "COMPLETING" | "CONFIGURING" | "SUSPENDED" => ExternalStatus::Pending,
        "COMPLETED" => ExternalStatus::Succeeded,
        "FAILED" | "NODE_FAIL" | "OUT_OF_MEMORY" | "TIMEOUT" | "PREEMPTED" | "DEADLINE" | "BOOT_FAIL" => {
            ExternalStatus::Failed
        }
        "CANCELLED" => ExternalStatus::Killed,
        _ => ExternalStatus::Unreachable,
    }
}

#[cfg(test)]
#[path = "transport_tests.rs"]
mod tests;
