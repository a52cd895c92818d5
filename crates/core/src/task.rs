// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task: a logical DAG node within a run's workflow.

use crate::attempt::AttemptId;
use crate::operator_key::OperatorKey;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Env var a campaign can set on a task to steer operator dispatch when it
/// has no reason to set the `operator_key` field directly.
pub const OPERATOR_KEY_ENV_VAR: &str = "MATTERSTACK_OPERATOR";

crate::define_id! {
    /// Identifier for a task, unique within its run.
    pub struct TaskId;
}

/// Logical status of a task, distinct from any one attempt's status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Pending,
    Ready,
    Submitted,
    Running,
    Completed,
    Failed,
}

impl TaskStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TaskStatus::Pending => "PENDING",
            TaskStatus::Ready => "READY",
            TaskStatus::Submitted => "SUBMITTED",
            TaskStatus::Running => "RUNNING",
            TaskStatus::Completed => "COMPLETED",
            TaskStatus::Failed => "FAILED",
        };
        write!(f, "{s}")
    }
}

/// Resource intent declared by a task, advisory to operators that honor it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceIntent {
    pub cores: Option<u32>,
    pub memory_mb: Option<u64>,
    pub walltime_secs: Option<u64>,
}

/// A logical node in a campaign's task DAG.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub task_id: TaskId,
    pub command: String,
    pub input_files: Vec<String>,
    pub resources: ResourceIntent,
    pub dependencies: BTreeSet<TaskId>,
    pub operator_key: Option<OperatorKey>,
    /// Environment assignments a campaign attaches to the task; consulted
    /// for `MATTERSTACK_OPERATOR` when `operator_key` is unset, and passed
    /// through to the operator at submission time.
    pub env: BTreeMap<String, String>,
    pub allow_failure: bool,
    pub logical_status: TaskStatus,
    pub current_attempt_id: Option<AttemptId>,
}

impl Task {
    pub fn new(task_id: TaskId, command: impl Into<String>) -> Self {
        Self {
            task_id,
            command: command.into(),
            input_files: Vec::new(),
            resources: ResourceIntent::default(),
            dependencies: BTreeSet::new(),
            operator_key: None,
            env: BTreeMap::new(),
            allow_failure: false,
            logical_status: TaskStatus::Pending,
            current_attempt_id: None,
        }
    }

    /// A task is ready to submit once every dependency has completed
    /// (or failed with `allow_failure` set on the dependency).
    pub fn dependencies_satisfied(&self, completed: &BTreeSet<TaskId>) -> bool {
        self.dependencies.iter().all(|dep| completed.contains(dep))
    }

    /// Resolve this task's operator key per the dispatch precedence: an
    /// explicit field beats `env["MATTERSTACK_OPERATOR"]` beats the
    /// workspace default supplied by the caller.
    pub fn resolve_operator_key(&self, workspace_default: &OperatorKey) -> Result<OperatorKey, crate::OperatorKeyError> {
        if let Some(key) = &self.operator_key {
            return Ok(key.clone());
        }
        if let Some(raw) = self.env.get(OPERATOR_KEY_ENV_VAR) {
            return OperatorKey::parse(raw);
        }
        Ok(workspace_default.clone())
    }
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
