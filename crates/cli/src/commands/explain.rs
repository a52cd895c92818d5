// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{open_store, resolve_handle, Ctx};
use crate::error::CliError;
use crate::table::{render, Column};
use ms_engine::frontier;

/// One line per non-terminal task: what it's waiting on and how to unblock it.
pub fn run(ctx: &Ctx, run_id: &str) -> Result<String, CliError> {
    let handle = resolve_handle(ctx, run_id)?;
    let store = open_store(&handle)?;
    let entries = frontier(&store, &handle.run_id)?;

    if entries.is_empty() {
        return Ok("nothing outstanding; every task has reached a terminal status".to_string());
    }

    let columns = [Column::left("TASK"), Column::left("HINT")];
    let rows: Vec<Vec<String>> = entries.iter().map(|e| vec![e.task_id.to_string(), e.hint.clone()]).collect();
    Ok(render(&columns, &rows))
}
