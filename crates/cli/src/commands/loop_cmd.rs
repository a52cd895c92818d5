// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `loop <run_id?>`: with a run id, block that one run to completion; with
//! none, service every discovered run in this foreground process the same
//! way `ms-daemond` would in the background.

use super::{load_config, resolve_handle, Ctx};
use crate::error::CliError;
use ms_core::RunStatus;
use ms_engine::{run_until_completion, StaticCampaign, WiringSource};
use std::time::Duration;

const TICK_INTERVAL: Duration = Duration::from_millis(500);

pub async fn run(ctx: &Ctx, run_id: Option<&str>) -> Result<Option<RunStatus>, CliError> {
    match run_id {
        Some(run_id) => {
            let handle = resolve_handle(ctx, run_id)?;
            let config = load_config(&handle.run_root)?;
            let campaign = StaticCampaign::resume();
            let status = run_until_completion(&handle, &campaign, &config, &WiringSource::default(), TICK_INTERVAL).await?;
            Ok(Some(status))
        }
        None => {
            loop {
                let entries = ms_daemon::run_one_cycle(&ctx.workspaces_root).await;
                if entries.is_empty() {
                    tokio::time::sleep(TICK_INTERVAL).await;
                    continue;
                }
                for entry in &entries {
                    if !matches!(entry.outcome, ms_daemon::RunOutcome::Progressed(_)) {
                        continue;
                    }
                    tracing::info!(run_id = %entry.run_id, "run progressed");
                }
                if !entries.iter().any(|e| matches!(e.outcome, ms_daemon::RunOutcome::Progressed(_))) {
                    tokio::time::sleep(TICK_INTERVAL).await;
                }
            }
        }
    }
}
