// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Evidence Builder (C8): assemble a run's state-store records and
//! filesystem layout into one canonical, idempotently rebuildable bundle.

use ms_core::{AttemptId, AttemptStatus, EngineError, OperatorKey, RunId, RunStatus, TaskId, TaskStatus};
use ms_storage::StateStore;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize)]
pub struct AttemptEvidence {
    pub attempt_id: AttemptId,
    pub attempt_index: u32,
    pub operator_key: OperatorKey,
    pub status: AttemptStatus,
    pub created_at: i64,
    pub submitted_at: Option<i64>,
    pub ended_at: Option<i64>,
    pub config_hash: String,
    pub evidence_local_path: PathBuf,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TaskEvidence {
    pub task_id: TaskId,
    pub status: TaskStatus,
    pub attempts: Vec<AttemptEvidence>,
}

/// Everything needed to explain a run after the fact, without re-querying
/// the state store: status, every task's attempt history, and the operator
/// wiring that governed it.
#[derive(Debug, Clone, Serialize)]
pub struct EvidenceBundle {
    pub run_id: RunId,
    pub workspace_slug: String,
    pub status: RunStatus,
    pub status_reason: Option<String>,
    pub created_at: i64,
    pub tasks: Vec<TaskEvidence>,
    pub wiring_hash: Option<String>,
    pub wiring_source: Option<String>,
}

fn read_wiring_metadata(run_root: &Path) -> (Option<String>, Option<String>) {
    let path = run_root.join("operators_snapshot").join("metadata.json");
    let Ok(raw) = std::fs::read_to_string(path) else {
        return (None, None);
    };
    let Ok(value) = serde_json::from_str::<serde_json::Value>(&raw) else {
        return (None, None);
    };
    let hash = value.get("sha256").and_then(|v| v.as_str()).map(str::to_string);
    let source = value.get("source").and_then(|v| v.as_str()).map(str::to_string);
    (hash, source)
}

/// Read the state store and run directory for `run_id` into one bundle.
pub fn build_bundle(store: &StateStore, run_id: &RunId) -> Result<EvidenceBundle, EngineError> {
    let run = store
        .get_run(run_id)?
        .ok_or_else(|| EngineError::ManifestValidation(format!("run {run_id} not found")))?;

    let tasks = store.get_tasks(run_id)?;
    let mut task_evidence = Vec::with_capacity(tasks.len());
    for task in &tasks {
        let attempts = store
            .list_attempts(run_id, &task.task_id)?
            .into_iter()
            .map(|a| AttemptEvidence {
                attempt_id: a.attempt_id,
                attempt_index: a.attempt_index,
                operator_key: a.operator_key,
                status: a.status,
                created_at: a.created_at,
                submitted_at: a.submitted_at,
                ended_at: a.ended_at,
                config_hash: a.config_hash,
                evidence_local_path: a.evidence_local_path,
                reason: a.reason,
            })
            .collect();
        task_evidence.push(TaskEvidence {
            task_id: task.task_id.clone(),
            status: task.logical_status,
            attempts,
        });
    }

    let (wiring_hash, wiring_source) = read_wiring_metadata(&run.run_root());

    Ok(EvidenceBundle {
        run_id: run.run_id,
        workspace_slug: run.workspace_slug,
        status: run.status,
        status_reason: run.status_reason,
        created_at: run.created_at,
        tasks: task_evidence,
        wiring_hash,
        wiring_source,
    })
}

/// Write `bundle` to `dest` as `evidence.json`, plus a copy of the pinned
/// operator wiring snapshot when one was resolved. Overwrites in place, so
/// repeated exports of the same run converge on the same bytes.
pub fn export_bundle(bundle: &EvidenceBundle, run_root: &Path, dest: &Path) -> Result<(), EngineError> {
    std::fs::create_dir_all(dest).map_err(|e| EngineError::TransientBackend(e.to_string()))?;
    let body = serde_json::to_string_pretty(bundle)
        .map_err(|e| EngineError::ManifestValidation(e.to_string()))?;
    std::fs::write(dest.join("evidence.json"), body)
        .map_err(|e| EngineError::TransientBackend(e.to_string()))?;

    let snapshot = run_root.join("operators_snapshot").join("operators.yaml");
    if snapshot.exists() {
        std::fs::copy(&snapshot, dest.join("operators.yaml"))
            .map_err(|e| EngineError::TransientBackend(e.to_string()))?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "evidence_tests.rs"]
mod tests;
