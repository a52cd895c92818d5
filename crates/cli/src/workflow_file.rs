// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Parses the JSON workflow file `init` seeds a run's
//! [`ms_engine::StaticCampaign`] with, into `Vec<Task>`.

use ms_core::{OperatorKey, ResourceIntent, Task, TaskId};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

#[derive(Debug, Deserialize)]
struct TaskSpec {
    task_id: String,
    command: String,
    #[serde(default)]
    input_files: Vec<String>,
    #[serde(default)]
    resources: ResourceIntent,
    #[serde(default)]
    dependencies: BTreeSet<String>,
    #[serde(default)]
    operator_key: Option<String>,
    #[serde(default)]
    env: BTreeMap<String, String>,
    #[serde(default)]
    allow_failure: bool,
}

#[derive(Debug, Deserialize)]
struct WorkflowFile {
    tasks: Vec<TaskSpec>,
}

/// Load and validate a workflow file, returning the `Task`s in file order
/// (the order `execute` falls back to when dependency sets tie, per §5).
pub fn load(path: &Path) -> Result<Vec<Task>, crate::error::CliError> {
    let raw = std::fs::read_to_string(path)?;
    let file: WorkflowFile = serde_json::from_str(&raw)
        .map_err(|e| crate::error::CliError::Usage(format!("malformed workflow file {}: {e}", path.display())))?;

    let mut tasks = Vec::with_capacity(file.tasks.len());
    for spec in file.tasks {
        let operator_key = spec
            .operator_key
            .as_deref()
            .map(OperatorKey::parse)
            .transpose()
            .map_err(|e| crate::error::CliError::Usage(format!("task {}: {e}", spec.task_id)))?;

        let mut task = Task::new(TaskId::new(spec.task_id), spec.command);
        task.input_files = spec.input_files;
        task.resources = spec.resources;
        task.dependencies = spec.dependencies.into_iter().map(TaskId::new).collect();
        task.operator_key = operator_key;
        task.env = spec.env;
        task.allow_failure = spec.allow_failure;
        tasks.push(task);
    }
    Ok(tasks)
}
