// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::Ctx;
use crate::error::CliError;
use crate::workflow_file;
use ms_core::{ChronologicalIdGen, SystemClock};
use ms_engine::{initialize_run, RunConfig, WiringSource};
use std::path::PathBuf;
use std::sync::Arc;

#[allow(clippy::too_many_arguments)]
pub fn run(
    ctx: &Ctx,
    workspace: &str,
    workflow_file_path: &PathBuf,
    operators_config: Option<PathBuf>,
    force: bool,
) -> Result<String, CliError> {
    let tasks = workflow_file::load(workflow_file_path)?;
    let campaign = ms_engine::StaticCampaign::new(tasks);
    let config = RunConfig::default();
    let wiring_source = WiringSource {
        explicit_path: operators_config,
        env_path: ms_engine::env::operators_config_path(),
        force,
    };

    let root_path = ctx
        .workspaces_root
        .parent()
        .ok_or_else(|| CliError::Usage("workspaces root has no parent directory".to_string()))?;

    let handle = initialize_run(
        root_path,
        workspace,
        &campaign,
        config,
        wiring_source,
        Arc::new(SystemClock),
        Arc::new(ChronologicalIdGen),
    )?;
    Ok(handle.run_id.to_string())
}
