// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

pub mod attempts;
pub mod cancel_attempt;
pub mod control;
pub mod evidence;
pub mod explain;
pub mod init;
pub mod loop_cmd;
pub mod rerun;
pub mod status;
pub mod step;
pub mod wiring;

use crate::error::CliError;
use ms_core::{ChronologicalIdGen, SystemClock};
use ms_engine::{find_run, RunConfig, RunHandle};
use ms_storage::StateStore;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Bare options every command needs to locate a run: where workspaces live
/// and, for output-shaped commands, how to render it.
pub struct Ctx {
    pub workspaces_root: PathBuf,
}

fn handle_for(workspace_slug: &str, run_id: &str, run_root: PathBuf) -> RunHandle {
    RunHandle {
        run_id: ms_core::RunId::new(run_id),
        workspace_slug: workspace_slug.to_string(),
        db_path: run_root.join("state.db"),
        run_root,
        clock: Arc::new(SystemClock),
        id_gen: Arc::new(ChronologicalIdGen),
    }
}

/// Resolve a bare `run_id` (spec §6's control surface takes no workspace
/// slug) to a live `RunHandle`, by scanning the workspaces directory.
pub fn resolve_handle(ctx: &Ctx, run_id: &str) -> Result<RunHandle, CliError> {
    let loc = find_run(&ctx.workspaces_root, run_id).ok_or_else(|| CliError::RunNotFound(run_id.to_string()))?;
    Ok(handle_for(&loc.workspace_slug, &loc.run_id, loc.run_root))
}

pub fn open_store(handle: &RunHandle) -> Result<StateStore, CliError> {
    Ok(StateStore::open(&handle.db_path)?)
}

pub fn load_config(run_root: &Path) -> Result<RunConfig, CliError> {
    Ok(RunConfig::load(&run_root.join("config.json"))?)
}
