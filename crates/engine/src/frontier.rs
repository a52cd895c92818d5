// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Diagnostics/Frontier (C7): classify every non-terminal task so a report
//! or CLI can explain, at a glance, what a run is waiting on.

use ms_core::{AttemptStatus, EngineError, OperatorKey, OperatorKind, RunId, TaskId, TaskStatus};
use ms_storage::StateStore;
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Why a non-terminal task hasn't settled yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskClassification {
    /// Blocked on one or more dependencies that haven't reached a status
    /// this task accepts.
    WaitingDependency { blocking: Vec<TaskId> },
    /// An attempt is in flight against an external backend (HPC queue,
    /// human reviewer, lab instrument) and hasn't reported terminal yet.
    WaitingExternal {
        operator_key: OperatorKey,
        evidence_path: PathBuf,
    },
    /// An attempt is actively executing (local subprocess, or a compute
    /// backend that has started but not yet gone quiet).
    Running,
    /// Dependencies are satisfied and no attempt has been created yet;
    /// will be picked up by the next EXECUTE phase.
    Ready,
}

/// One frontier entry: a task's classification plus an operator-facing hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    pub task_id: TaskId,
    pub classification: TaskClassification,
    pub hint: String,
}

fn hint_for(classification: &TaskClassification) -> String {
    match classification {
        TaskClassification::WaitingDependency { blocking } => {
            let ids: Vec<String> = blocking.iter().map(ToString::to_string).collect();
            format!("waiting on: {}", ids.join(", "))
        }
        TaskClassification::WaitingExternal {
            operator_key,
            evidence_path,
        } => match operator_key.kind() {
            OperatorKind::Human => format!(
                "awaiting human review; drop a verdict under {}",
                evidence_path.display()
            ),
            OperatorKind::Experiment => format!(
                "awaiting instrument output; watch {}",
                evidence_path.display()
            ),
            OperatorKind::Hpc => format!(
                "queued or running on a remote scheduler; evidence lands at {}",
                evidence_path.display()
            ),
            OperatorKind::Local => format!(
                "running as a local subprocess; evidence lands at {}",
                evidence_path.display()
            ),
        },
        TaskClassification::Running => "attempt in progress".to_string(),
        TaskClassification::Ready => "dependencies satisfied; will submit next tick".to_string(),
    }
}

/// Classify every non-terminal task in `run_id`.
pub fn frontier(store: &StateStore, run_id: &RunId) -> Result<Vec<FrontierEntry>, EngineError> {
    let tasks = store.get_tasks(run_id)?;
    let accepted: BTreeSet<TaskId> = tasks
        .iter()
        .filter(|t| t.logical_status == TaskStatus::Completed || (t.logical_status == TaskStatus::Failed && t.allow_failure))
        .map(|t| t.task_id.clone())
        .collect();

    let mut out = Vec::new();
    for task in tasks.iter().filter(|t| !t.logical_status.is_terminal()) {
        let classification = match task.logical_status {
            TaskStatus::Pending => {
                let blocking: Vec<TaskId> = task
                    .dependencies
                    .iter()
                    .filter(|d| !accepted.contains(*d))
                    .cloned()
                    .collect();
                TaskClassification::WaitingDependency { blocking }
            }
            TaskStatus::Ready => TaskClassification::Ready,
            TaskStatus::Submitted | TaskStatus::Running => {
                match store.get_current_attempt(run_id, &task.task_id)? {
                    Some(attempt)
                        if attempt.status == AttemptStatus::WaitingExternal
                            || !attempt.operator_key.kind().is_compute() =>
                    {
                        TaskClassification::WaitingExternal {
                            operator_key: attempt.operator_key,
                            evidence_path: attempt.evidence_local_path,
                        }
                    }
                    _ => TaskClassification::Running,
                }
            }
            TaskStatus::Completed | TaskStatus::Failed => unreachable!("filtered to non-terminal above"),
        };
        let hint = hint_for(&classification);
        out.push(FrontierEntry {
            task_id: task.task_id.clone(),
            classification,
            hint,
        });
    }
    Ok(out)
}

#[cfg(test)]
#[path = "frontier_tests.rs"]
mod tests;
