// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use ms_core::test_support::ready_task;
use ms_core::{AnalyzeResults, Campaign, FakeClock, SequentialIdGen, Workflow};
use ms_engine::{initialize_run, WiringSource};
use ms_storage::RunLock;
use serde_json::{json, Value};

struct OneTaskCampaign;

impl Campaign for OneTaskCampaign {
    fn plan(&self, state: &Value) -> Option<Workflow> {
        if state.is_null() {
            Some(vec![ready_task("a", "echo hi", "local.default")])
        } else {
            None
        }
    }

    fn analyze(&self, _state: &Value, results: &AnalyzeResults) -> Value {
        json!({ "seen": results.len() })
    }
}

fn init_demo_run(root_path: &std::path::Path) -> ms_engine::RunHandle {
    initialize_run(
        root_path,
        "demo",
        &OneTaskCampaign,
        RunConfig::default(),
        WiringSource::default(),
        Arc::new(FakeClock::new()),
        Arc::new(SequentialIdGen::new("run")),
    )
    .unwrap()
}

#[tokio::test]
async fn run_one_cycle_discovers_and_ticks_a_run() {
    let root = tempfile::tempdir().unwrap();
    let handle = init_demo_run(root.path());

    let entries = run_one_cycle(&root.path().join("workspaces")).await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].run_id, handle.run_id);
    assert!(matches!(entries[0].outcome, RunOutcome::Progressed(_)));
}

#[tokio::test]
async fn run_one_cycle_skips_a_run_whose_lock_is_held() {
    let root = tempfile::tempdir().unwrap();
    let handle = init_demo_run(root.path());

    let _lock = RunLock::try_acquire(RunLock::path_for_db(&handle.db_path)).unwrap();

    let entries = run_one_cycle(&root.path().join("workspaces")).await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].outcome, RunOutcome::LockHeld);
}

#[tokio::test]
async fn run_one_cycle_on_empty_workspaces_dir_finds_nothing() {
    let root = tempfile::tempdir().unwrap();
    let entries = run_one_cycle(&root.path().join("workspaces")).await;
    assert!(entries.is_empty());
}
