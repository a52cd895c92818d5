// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{open_store, resolve_handle, Ctx};
use crate::error::CliError;
use crate::table::{render, Column};
use ms_core::TaskId;

/// `attempts <run_id> <task_id>`: every attempt of one task, chronological.
pub fn run(ctx: &Ctx, run_id: &str, task_id: &str) -> Result<String, CliError> {
    let handle = resolve_handle(ctx, run_id)?;
    let store = open_store(&handle)?;
    let attempts = store.list_attempts(&handle.run_id, &TaskId::new(task_id))?;

    let columns = [
        Column::right("IDX"),
        Column::left("ATTEMPT_ID"),
        Column::left("STATUS"),
        Column::left("OPERATOR_KEY"),
        Column::left("REASON"),
    ];
    let rows: Vec<Vec<String>> = attempts
        .iter()
        .map(|a| {
            vec![
                a.attempt_index.to_string(),
                a.attempt_id.to_string(),
                a.status.to_string(),
                a.operator_key.to_string(),
                a.reason.clone().unwrap_or_else(|| "-".to_string()),
            ]
        })
        .collect();
    Ok(render(&columns, &rows))
}
