// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{open_store, resolve_handle, Ctx};
use crate::error::CliError;
use crate::table::{render, Column};

/// One line per task: id, status, current attempt, attempt count.
pub fn run(ctx: &Ctx, run_id: &str) -> Result<String, CliError> {
    let handle = resolve_handle(ctx, run_id)?;
    let store = open_store(&handle)?;
    let run = store
        .get_run(&handle.run_id)?
        .ok_or_else(|| CliError::RunNotFound(run_id.to_string()))?;
    let tasks = store.get_tasks(&handle.run_id)?;

    let columns = [
        Column::left("TASK"),
        Column::left("STATUS"),
        Column::right("ATTEMPTS"),
        Column::left("CURRENT_ATTEMPT"),
    ];
    let mut rows = Vec::with_capacity(tasks.len());
    for task in &tasks {
        let attempts = store.list_attempts(&handle.run_id, &task.task_id)?;
        rows.push(vec![
            task.task_id.to_string(),
            task.logical_status.to_string(),
            attempts.len().to_string(),
            task.current_attempt_id
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_else(|| "-".to_string()),
        ]);
    }

    let summary = format!(
        "run {}  status {}{}\n\n",
        run.run_id,
        run.status,
        run.status_reason.map(|r| format!("  ({r})")).unwrap_or_default(),
    );
    let terminal_count = tasks.iter().filter(|t| t.logical_status.is_terminal()).count();
    Ok(format!(
        "{summary}{}\n{terminal_count}/{} tasks settled",
        render(&columns, &rows),
        tasks.len()
    ))
}
