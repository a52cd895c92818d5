// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Campaign: the pure plan/analyze contract a workspace implements.

use crate::task::Task;
use serde_json::Value;
use std::collections::BTreeMap;

/// The ephemeral DAG produced by a single `plan()` call. Never independently
/// persisted beyond its constituent tasks.
pub type Workflow = Vec<Task>;

/// Per-task terminal outcome handed to `analyze`, keyed by task id string.
pub type AnalyzeResults = BTreeMap<String, TaskResult>;

/// What `analyze` sees about one terminal task: its final status plus the
/// metadata of the attempt that settled it.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TaskResult {
    pub status: crate::task::TaskStatus,
    pub attempt_id: Option<String>,
    pub evidence_path: Option<String>,
    pub artifact_paths: Vec<String>,
}

/// Two pure, synchronous methods driving a campaign's iteration logic. Both
/// operate over opaque JSON state so the engine never needs to know a
/// campaign's concrete state shape.
pub trait Campaign: Send + Sync {
    /// Produce the next iteration's tasks, or `None` to mark the campaign
    /// complete.
    fn plan(&self, state: &Value) -> Option<Workflow>;

    /// Consume terminal results of the current workflow and return the
    /// state to persist for the next `plan` call.
    fn analyze(&self, state: &Value, results: &AnalyzeResults) -> Value;
}

#[cfg(test)]
#[path = "campaign_tests.rs"]
mod tests;
