// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The compute operator variant (`hpc`/`local`): drives a
//! [`ClusterTransport`] through the prepare/submit/check/collect contract.

use crate::error::OperatorError;
use crate::operator::{Operator, OperatorContext};
use crate::path_safety::resolve_within;
use crate::transport::{ClusterTransport, WorkDir};
use async_trait::async_trait;
use ms_core::{Attempt, ExternalStatus, Task};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Parse and validate a task's command with the shared shell grammar before
/// it is ever embedded into a submit script, so a malformed command fails
/// the attempt deterministically at `prepare` rather than surfacing as an
/// opaque non-zero exit from the backend.
fn validate_command(command: &str) -> Result<(), OperatorError> {
    let ast = ms_shell::Parser::parse(command)
        .map_err(|e| OperatorError::ManifestValidation(format!("invalid command: {e}")))?;
    ms_shell::validate(&ast).map_err(|errors| {
        let joined = errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        OperatorError::ManifestValidation(format!("command failed validation: {joined}"))
    })
}

/// A compute operator backed by some [`ClusterTransport`]. The same
/// implementation drives both `local` and `hpc` operator kinds; they differ
/// only in which transport (and `remote_root`) they're constructed with.
pub struct ComputeOperator<T: ClusterTransport> {
    transport: T,
    /// Root directory the backend's `remote_relative` paths are joined onto.
    /// `None` for backends with no separate remote namespace (local).
    remote_root: Option<String>,
}

impl<T: ClusterTransport> ComputeOperator<T> {
    pub fn new(transport: T, remote_root: Option<String>) -> Self {
        Self {
            transport,
            remote_root,
        }
    }

    fn remote_relative(ctx: &OperatorContext, task_id: &str, attempt_id: &str) -> PathBuf {
        Path::new(&ctx.workspace_slug)
            .join(ctx.run_id.as_str())
            .join(task_id)
            .join(attempt_id)
    }

    fn workdir(&self, ctx: &OperatorContext, attempt: &Attempt) -> Result<WorkDir, OperatorError> {
        let local = resolve_within(&ctx.run_root, &attempt.evidence_local_path)?;
        let remote_relative =
            Self::remote_relative(ctx, attempt.task_id.as_str(), attempt.attempt_id.as_str());
        Ok(WorkDir {
            local,
            remote_relative,
        })
    }
}

#[derive(Debug, Serialize)]
struct Manifest<'a> {
    task_id: &'a str,
    attempt_id: &'a str,
    attempt_index: u32,
    command: &'a str,
    operator_key: &'a str,
    cores: Option<u32>,
    memory_mb: Option<u32>,
    walltime_secs: Option<u32>,
    config_hash: &'a str,
    config_files: &'a [String],
}

/// Writes the POSIX-shell wrapper that every compute backend (local
/// subprocess or Slurm batch script) runs: it redirects stdout/stderr into
/// the evidence directory and leaves an `exit_code` marker behind so a
/// transport can probe completion without holding a process handle open
/// across ticks.
pub fn write_submit_script(command: &str) -> String {
    format!(
        "#!/bin/sh\nset -u\n{{ {command}; }} > stdout.log 2> stderr.log\necho $? > exit_code\n"
    )
}

async fn copy_config_snapshot(
    workspace_root: &Path,
    config_files: &[String],
    dest_dir: &Path,
) -> Result<(), OperatorError> {
    tokio::fs::create_dir_all(dest_dir).await?;
    let mut checksums = String::new();
    for rel in config_files {
        let source = workspace_root.join(rel);
        let bytes = tokio::fs::read(&source).await?;
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        let digest = format!("{:x}", hasher.finalize());
        let file_name = Path::new(rel)
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| rel.replace('/', "_"));
        tokio::fs::write(dest_dir.join(&file_name), &bytes).await?;
        checksums.push_str(&format!("{digest}  {file_name}\n"));
    }
    tokio::fs::write(dest_dir.join("checksums.sha256"), checksums).await?;
    Ok(())
}

#[async_trait]
impl<T: ClusterTransport> Operator for ComputeOperator<T> {
    async fn prepare(
        &self,
        ctx: &OperatorContext,
        task: &Task,
        attempt: &mut Attempt,
    ) -> Result<(), OperatorError> {
        let attempt_dir = resolve_within(&ctx.run_root, &attempt.evidence_local_path)?;
        tokio::fs::create_dir_all(&attempt_dir).await?;
        tokio::fs::create_dir_all(attempt_dir.join("outputs")).await?;

        copy_config_snapshot(
            &ctx.run_root,
            &attempt.config_files,
            &attempt_dir.join("config_snapshot"),
        )
        .await?;

        validate_command(&task.command)?;

        let manifest = Manifest {
            task_id: task.task_id.as_str(),
            attempt_id: attempt.attempt_id.as_str(),
            attempt_index: attempt.attempt_index,
            command: &task.command,
            operator_key: attempt.operator_key.as_str(),
            cores: task.resources.cores,
            memory_mb: task.resources.memory_mb,
            walltime_secs: task.resources.walltime_secs,
            config_hash: &attempt.config_hash,
            config_files: &attempt.config_files,
        };
        let manifest_json = serde_json::to_string_pretty(&manifest)?;
        tokio::fs::write(attempt_dir.join("manifest.json"), manifest_json).await?;

        let script = write_submit_script(&task.command);
        tokio::fs::write(attempt_dir.join("submit.sh"), script).await?;

        if let Some(root) = &self.remote_root {
            let relative = Self::remote_relative(ctx, task.task_id.as_str(), attempt.attempt_id.as_str());
            attempt.workdir_remote = Some(format!("{root}/{}", relative.display()));
        }
        Ok(())
    }

    async fn submit(&self, ctx: &OperatorContext, attempt: &mut Attempt) -> Result<(), OperatorError> {
        if attempt.external_id.is_some() {
            return Ok(());
        }
        let workdir = self.workdir(ctx, attempt)?;
        self.transport.stage(&workdir).await?;
        let external_id = self.transport.submit(&workdir).await?;
        attempt.external_id = Some(external_id);
        Ok(())
    }

    async fn check(&self, ctx: &OperatorContext, attempt: &Attempt) -> Result<ExternalStatus, OperatorError> {
        let external_id = attempt
            .external_id
            .as_ref()
            .ok_or_else(|| OperatorError::AttemptFailed("check called before submit".to_string()))?;
        let workdir = self.workdir(ctx, attempt)?;
        self.transport.query_status(external_id, &workdir).await
    }

    async fn collect(&self, ctx: &OperatorContext, attempt: &mut Attempt) -> Result<(), OperatorError> {
        let workdir = self.workdir(ctx, attempt)?;
        self.transport.fetch_outputs(&workdir).await?;
        if !workdir.local.join("stdout.log").exists() {
            return Err(OperatorError::AttemptFailed(
                "collect found no stdout.log in evidence directory".to_string(),
            ));
        }
        Ok(())
    }

    async fn cancel(&self, _ctx: &OperatorContext, attempt: &Attempt) -> Result<(), OperatorError> {
        if let Some(external_id) = &attempt.external_id {
            self.transport.cancel(external_id).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "compute_tests.rs"]
mod tests;
