// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{load_config, resolve_handle, Ctx};
use crate::error::CliError;
use ms_core::RunStatus;
use ms_engine::{step_run, StaticCampaign, WiringSource};
use std::path::PathBuf;

/// Drive `run_id` forward exactly one tick. `operators_config`/`force` let a
/// caller attempt a wiring override on this tick; by default a step reuses
/// whatever is already pinned.
pub async fn run(
    ctx: &Ctx,
    run_id: &str,
    operators_config: Option<PathBuf>,
    force: bool,
) -> Result<RunStatus, CliError> {
    let handle = resolve_handle(ctx, run_id)?;
    let config = load_config(&handle.run_root)?;
    let campaign = StaticCampaign::resume();
    let wiring_source = WiringSource {
        explicit_path: operators_config,
        env_path: ms_engine::env::operators_config_path(),
        force,
    };
    let outcome = step_run(&handle, &campaign, &config, &wiring_source).await?;
    Ok(outcome.run_status)
}
