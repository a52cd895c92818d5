// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{open_store, resolve_handle, Ctx};
use crate::error::CliError;
use ms_core::{SystemClock, TaskId};

pub fn run(ctx: &Ctx, run_id: &str, task_id: &str, recursive: bool) -> Result<(), CliError> {
    let handle = resolve_handle(ctx, run_id)?;
    let store = open_store(&handle)?;
    Ok(ms_engine::rerun(
        &store,
        &handle.run_id,
        &TaskId::new(task_id),
        recursive,
        "cli",
        &SystemClock,
    )?)
}
