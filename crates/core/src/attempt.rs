// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Attempt: one immutable execution trial of a task against an operator.

use crate::operator_key::OperatorKey;
use crate::run::RunId;
use crate::task::TaskId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;

crate::define_id! {
    /// Chronologically-sortable identifier for an attempt.
    pub struct AttemptId;
}

/// Execution status of an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttemptStatus {
    Created,
    Submitted,
    Running,
    WaitingExternal,
    Completed,
    Failed,
    FailedInit,
    Cancelled,
}

impl AttemptStatus {
    /// Terminal attempts are immutable except for reason appends (spec §3).
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AttemptStatus::Completed
                | AttemptStatus::Failed
                | AttemptStatus::FailedInit
                | AttemptStatus::Cancelled
        )
    }
}

impl std::fmt::Display for AttemptStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AttemptStatus::Created => "CREATED",
            AttemptStatus::Submitted => "SUBMITTED",
            AttemptStatus::Running => "RUNNING",
            AttemptStatus::WaitingExternal => "WAITING_EXTERNAL",
            AttemptStatus::Completed => "COMPLETED",
            AttemptStatus::Failed => "FAILED",
            AttemptStatus::FailedInit => "FAILED_INIT",
            AttemptStatus::Cancelled => "CANCELLED",
        };
        write!(f, "{s}")
    }
}

/// The normalized outcome an operator's `check` reports back to the engine,
/// independent of how any given backend spells its own status strings.
///
/// `Operator::check` maps whatever the backend returns (Slurm job state,
/// subprocess exit code, a human reviewer's verdict file, an instrument's
/// drop-box marker) onto this small, closed set before the engine ever sees
/// it. The engine's `collect` decision table is then just a match over these
/// six variants, never over backend-specific strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExternalStatus {
    /// Still queued or running; no terminal outcome yet. `collect` is not
    /// called; the attempt stays in its current non-terminal status.
    Pending,
    /// The backend reports success. `collect` runs and, on success, the
    /// attempt moves to COMPLETED.
    Succeeded,
    /// The backend reports a definitive failure (non-zero exit, Slurm
    /// `FAILED`/`NODE_FAIL`, a reviewer rejection). `collect` runs to gather
    /// evidence and the attempt moves to FAILED.
    Failed,
    /// The backend reports the job was killed externally (Slurm
    /// `CANCELLED`/`TIMEOUT`, an operator-side preemption). No `collect`
    /// attempt is made for artifacts that may not exist; the attempt moves
    /// straight to CANCELLED.
    Killed,
    /// `check` itself could not reach the backend (transport error, SSH
    /// timeout). The attempt's status is left unchanged; the engine retries
    /// `check` next tick. Does not count against definitive failure.
    Unreachable,
    /// The backend has no record of the `external_id` at all (job purged
    /// from the scheduler's history, directory missing). Treated as a
    /// definitive failure: the attempt moves to FAILED with a reason noting
    /// the lost external state.
    Unknown,
}

/// One immutable execution trial of a task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attempt {
    pub attempt_id: AttemptId,
    pub task_id: TaskId,
    pub run_id: RunId,
    pub attempt_index: u32,
    pub status: AttemptStatus,
    pub external_id: Option<String>,
    pub operator_key: OperatorKey,
    pub operator_data: Value,
    pub workdir_remote: Option<String>,
    pub evidence_local_path: PathBuf,
    pub config_hash: String,
    pub config_files: Vec<String>,
    pub created_at: i64,
    pub submitted_at: Option<i64>,
    pub ended_at: Option<i64>,
    pub reason: Option<String>,
}

impl Attempt {
    /// Append to `reason`, the one field mutable after a terminal status is
    /// reached (e.g. recording that a post-hoc evidence scrape also failed).
    pub fn append_reason(&mut self, note: &str) {
        match &mut self.reason {
            Some(existing) => {
                existing.push_str("; ");
                existing.push_str(note);
            }
            None => self.reason = Some(note.to_string()),
        }
    }
}

#[cfg(test)]
#[path = "attempt_tests.rs"]
mod tests;
