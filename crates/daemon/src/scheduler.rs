// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Multi-run daemon round-robin (spec §5 "Multi-run daemon mode"): scan
//! every run root under a workspaces directory, tick each one whose lock is
//! free, skip the rest, and shuffle the visiting order every cycle so no
//! run is ever systematically starved.

use ms_core::{RunId, RunStatus, SystemClock};
use ms_engine::{list_run_roots, RunConfig, RunHandle, StaticCampaign};
use rand::seq::SliceRandom;
use std::path::PathBuf;
use std::sync::Arc;

/// The outcome of ticking one discovered run this cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Progressed(RunStatus),
    Idle(RunStatus),
    LockHeld,
    Failed(String),
}

/// What one `run_one_cycle` call did, per run visited.
#[derive(Debug, Clone)]
pub struct CycleEntry {
    pub run_id: RunId,
    pub outcome: RunOutcome,
}

fn handle_for(workspace_slug: &str, run_id: &str, run_root: PathBuf) -> RunHandle {
    RunHandle {
        run_id: RunId::new(run_id),
        workspace_slug: workspace_slug.to_string(),
        db_path: run_root.join("state.db"),
        run_root,
        clock: Arc::new(SystemClock),
        id_gen: Arc::new(ms_core::ChronologicalIdGen),
    }
}

/// Tick every run under `workspaces_dir` once, in randomized order,
/// skipping any run whose lock another process currently holds. Never
/// blocks on a single run's task completion — `ms_engine::step_run`
/// itself is one non-blocking tick.
pub async fn run_one_cycle(workspaces_dir: &std::path::Path) -> Vec<CycleEntry> {
    let mut locations = list_run_roots(workspaces_dir);
    locations.shuffle(&mut rand::rng());

    let mut entries = Vec::with_capacity(locations.len());
    for loc in locations {
        let handle = handle_for(&loc.workspace_slug, &loc.run_id, loc.run_root.clone());
        let config = RunConfig::load(&loc.run_root.join("config.json")).unwrap_or_default();
        let wiring_source = ms_engine::WiringSource::default();
        let campaign = StaticCampaign::resume();

        let outcome = match ms_engine::step_run(&handle, &campaign, &config, &wiring_source).await {
            Ok(step) if step.progressed => RunOutcome::Progressed(step.run_status),
            Ok(step) => RunOutcome::Idle(step.run_status),
            Err(ms_core::EngineError::LockHeld(_)) => RunOutcome::LockHeld,
            Err(e) => {
                tracing::warn!(run_id = %handle.run_id, error = %e, "run tick failed");
                RunOutcome::Failed(e.to_string())
            }
        };
        entries.push(CycleEntry {
            run_id: handle.run_id,
            outcome,
        });
    }
    entries
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
