// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `cancel-attempt <run_id> <attempt_id>` needs the owning task id to look
//! the attempt up in the store (§4.1's `list_attempts` is task-scoped), so
//! this subcommand takes `task_id` as an extra required argument beyond
//! the abstract two-argument form in §6.

use super::{open_store, resolve_handle, Ctx};
use crate::error::CliError;
use ms_core::{AttemptId, SystemClock, TaskId};
use ms_operators::{OperatorContext, OperatorRegistry};

pub async fn run(ctx: &Ctx, run_id: &str, task_id: &str, attempt_id: &str) -> Result<(), CliError> {
    let handle = resolve_handle(ctx, run_id)?;
    let store = open_store(&handle)?;
    let task_id = TaskId::new(task_id);
    let attempt_id = AttemptId::new(attempt_id);

    let workspace_root = handle
        .run_root
        .parent()
        .and_then(std::path::Path::parent)
        .map(std::path::Path::to_path_buf)
        .unwrap_or_else(|| handle.run_root.clone());
    let resolved = ms_wiring::resolve(&ms_wiring::ResolveOptions {
        run_root: handle.run_root.clone(),
        workspace_root,
        explicit_path: None,
        env_path: ms_engine::env::operators_config_path(),
        force: false,
    })
    .map_err(ms_core::EngineError::from)?;
    let registry = OperatorRegistry::build(&resolved.config).map_err(ms_core::EngineError::from)?;

    let attempt = store
        .list_attempts(&handle.run_id, &task_id)?
        .into_iter()
        .find(|a| a.attempt_id == attempt_id)
        .ok_or_else(|| CliError::RunNotFound(format!("attempt {attempt_id} on task {task_id}")))?;

    let operator = registry
        .get(&attempt.operator_key)
        .ok_or_else(|| CliError::Engine(ms_core::EngineError::UnknownOperatorKey(attempt.operator_key.to_string())))?;

    let op_ctx = OperatorContext {
        run_id: handle.run_id.clone(),
        workspace_slug: handle.workspace_slug.clone(),
        run_root: handle.run_root.clone(),
    };

    Ok(ms_engine::cancel_attempt(
        &store,
        &handle.run_id,
        &task_id,
        &attempt_id,
        operator.as_ref(),
        &op_ctx,
        "cli",
        &SystemClock,
    )
    .await?)
}
