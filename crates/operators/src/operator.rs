// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Operator Interface (C4): the uniform `prepare -> submit -> check ->
//! collect` lifecycle contract applied to every execution backend.

use crate::error::OperatorError;
use async_trait::async_trait;
use ms_core::{Attempt, ExternalStatus, RunId, Task};
use std::path::{Path, PathBuf};

/// Everything an operator needs about the run it is acting within, beyond
/// the attempt and task it was handed.
#[derive(Debug, Clone)]
pub struct OperatorContext {
    pub run_id: RunId,
    pub workspace_slug: String,
    pub run_root: PathBuf,
}

impl OperatorContext {
    /// The attempt-scoped evidence directory: `tasks/<task_id>/attempts/<attempt_id>/`.
    pub fn attempt_dir(&self, task_id: &str, attempt_id: &str) -> PathBuf {
        self.run_root
            .join("tasks")
            .join(task_id)
            .join("attempts")
            .join(attempt_id)
    }
}

/// The lifecycle contract every execution backend implements uniformly.
///
/// All four operations are pure in terms of the supplied attempt and the
/// run root: no operator may touch state outside the attempt it was handed,
/// and no operator owns its own background threads or connections beyond
/// the lifetime of a single call.
#[async_trait]
pub trait Operator: Send + Sync {
    /// Materialize the attempt-scoped workspace and write its manifest,
    /// config snapshot, and submit script. Leaves `attempt.status` at
    /// `CREATED`. Must not touch paths outside the run root.
    async fn prepare(
        &self,
        ctx: &OperatorContext,
        task: &Task,
        attempt: &mut Attempt,
    ) -> Result<(), OperatorError>;

    /// Transmit to the backend and record `external_id`. Idempotent: if
    /// `attempt.external_id` is already set, returns without resubmitting.
    async fn submit(&self, ctx: &OperatorContext, attempt: &mut Attempt) -> Result<(), OperatorError>;

    /// Query the backend for the attempt's current status. A pure read;
    /// must have no side effects on the run root.
    async fn check(&self, ctx: &OperatorContext, attempt: &Attempt) -> Result<ExternalStatus, OperatorError>;

    /// Download or ingest results into the attempt's evidence directory.
    /// Called exactly once, on the tick where `check` first reports
    /// `Succeeded`.
    async fn collect(&self, ctx: &OperatorContext, attempt: &mut Attempt) -> Result<(), OperatorError>;

    /// Best-effort request that the backend stop the attempt. Operators
    /// with no meaningful cancel path (human, experiment) accept the
    /// default no-op.
    async fn cancel(&self, _ctx: &OperatorContext, _attempt: &Attempt) -> Result<(), OperatorError> {
        Ok(())
    }
}

/// Where an attempt's evidence directory lives, relative to the run root,
/// expressed as a path for convenience at call sites that only have the ids.
pub fn evidence_relative_path(task_id: &str, attempt_id: &str) -> PathBuf {
    Path::new("tasks")
        .join(task_id)
        .join("attempts")
        .join(attempt_id)
}
