// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::attempt::{Attempt, AttemptId, AttemptStatus};
use crate::operator_key::OperatorKey;
use crate::run::{Run, RunId, RunStatus};
use crate::task::{Task, TaskId, TaskStatus};
use serde_json::json;
use std::path::PathBuf;

pub fn sample_run(run_id: &str, workspace_slug: &str) -> Run {
    Run::new(
        RunId::new(run_id),
        workspace_slug,
        PathBuf::from("/tmp/matterstack-test"),
        1_700_000_000_000,
    )
}

pub fn running_run(run_id: &str, workspace_slug: &str) -> Run {
    let mut run = sample_run(run_id, workspace_slug);
    run.status = RunStatus::Running;
    run
}

pub fn pending_task(task_id: &str, command: &str) -> Task {
    Task::new(TaskId::new(task_id), command)
}

pub fn ready_task(task_id: &str, command: &str, operator_key: &str) -> Task {
    let mut task = pending_task(task_id, command);
    task.logical_status = TaskStatus::Ready;
    task.operator_key = Some(OperatorKey::parse(operator_key).unwrap());
    task
}

pub fn created_attempt(attempt_id: &str, task_id: &str, run_id: &str, operator_key: &str) -> Attempt {
    Attempt {
        attempt_id: AttemptId::new(attempt_id),
        task_id: TaskId::new(task_id),
        run_id: RunId::new(run_id),
        attempt_index: 1,
        status: AttemptStatus::Created,
        external_id: None,
        operator_key: OperatorKey::parse(operator_key).unwrap(),
        operator_data: json!({}),
        workdir_remote: None,
        evidence_local_path: PathBuf::from(format!("tasks/{task_id}/attempts/{attempt_id}")),
        config_hash: "testhash".to_string(),
        config_files: vec![],
        created_at: 1_700_000_000_000,
        submitted_at: None,
        ended_at: None,
        reason: None,
    }
}
