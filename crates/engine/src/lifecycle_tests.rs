// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use ms_core::test_support::{created_attempt, ready_task, sample_run};
use ms_core::{AnalyzeResults, Campaign, ExternalStatus, FakeClock, SequentialIdGen, Workflow};
use ms_operators::{FakeOperator, OperatorCall, OperatorRegistry};
use serde_json::json;
use std::collections::HashMap;

fn ctx() -> OperatorContext {
    OperatorContext {
        run_id: RunId::new("run1"),
        workspace_slug: "ws".to_string(),
        run_root: std::path::PathBuf::from("/tmp/matterstack-lifecycle-test"),
    }
}

fn fake_registry(op: FakeOperator) -> OperatorRegistry {
    let mut map: HashMap<OperatorKey, std::sync::Arc<dyn ms_operators::Operator>> = HashMap::new();
    map.insert(OperatorKey::parse("local.fake").unwrap(), std::sync::Arc::new(op));
    OperatorRegistry::from_map(map)
}

fn store_with_run(run_id: &str) -> ms_storage::StateStore {
    let store = ms_storage::StateStore::open_in_memory().unwrap();
    store.create_run(&sample_run(run_id, "ws")).unwrap();
    store
}

/// A campaign whose single workflow completes after one terminal task.
struct OneShotCampaign;

impl Campaign for OneShotCampaign {
    fn plan(&self, state: &Value) -> Option<Workflow> {
        if state.is_null() {
            Some(vec![ready_task("a", "echo a", "local.fake")])
        } else {
            None
        }
    }

    fn analyze(&self, _state: &Value, results: &AnalyzeResults) -> Value {
        json!({ "seen": results.len() })
    }
}

#[tokio::test]
async fn poll_phase_completes_attempt_on_success() {
    let store = store_with_run("run1");
    let run_id = RunId::new("run1");
    let mut task = ready_task("a", "echo a", "local.fake");
    task.logical_status = TaskStatus::Submitted;
    store.add_workflow(&run_id, &[task]).unwrap();

    let attempt = created_attempt("att-1", "a", "run1", "local.fake");
    store
        .create_attempt(
            &attempt.attempt_id,
            &attempt.task_id,
            &run_id,
            &attempt.operator_key,
            &attempt.operator_data,
            &attempt.config_hash,
            &attempt.config_files,
            &attempt.evidence_local_path,
            None,
            attempt.created_at,
        )
        .unwrap();
    store
        .update_attempt(
            &attempt.attempt_id,
            AttemptUpdate {
                status: Some(AttemptStatus::Submitted),
                ..Default::default()
            },
        )
        .unwrap();
    store
        .update_task_status(&run_id, &TaskId::new("a"), TaskStatus::Submitted, Some(&attempt.attempt_id))
        .unwrap();

    let fake = FakeOperator::new(ExternalStatus::Succeeded);
    let registry = fake_registry(fake.clone());
    let clock = FakeClock::new();

    let progressed = poll_phase(&store, &registry, &ctx(), &clock).await.unwrap();
    assert!(progressed);

    let task = store.get_tasks(&run_id).unwrap().remove(0);
    assert_eq!(task.logical_status, TaskStatus::Completed);
    assert!(matches!(fake.calls().last(), Some(OperatorCall::Collect { .. })));
}

#[tokio::test]
async fn poll_phase_leaves_unreachable_attempt_untouched() {
    let store = store_with_run("run1");
    let run_id = RunId::new("run1");
    let mut task = ready_task("a", "echo a", "local.fake");
    task.logical_status = TaskStatus::Submitted;
    store.add_workflow(&run_id, &[task]).unwrap();

    let attempt = created_attempt("att-1", "a", "run1", "local.fake");
    store
        .create_attempt(
            &attempt.attempt_id,
            &attempt.task_id,
            &run_id,
            &attempt.operator_key,
            &attempt.operator_data,
            &attempt.config_hash,
            &attempt.config_files,
            &attempt.evidence_local_path,
            None,
            attempt.created_at,
        )
        .unwrap();
    store
        .update_task_status(&run_id, &TaskId::new("a"), TaskStatus::Submitted, Some(&attempt.attempt_id))
        .unwrap();

    let fake = FakeOperator::new(ExternalStatus::Unreachable);
    let registry = fake_registry(fake);
    let clock = FakeClock::new();

    let progressed = poll_phase(&store, &registry, &ctx(), &clock).await.unwrap();
    assert!(!progressed);

    let task = store.get_tasks(&run_id).unwrap().remove(0);
    assert_eq!(task.logical_status, TaskStatus::Submitted);
}

#[tokio::test]
async fn execute_phase_submits_ready_task_up_to_global_cap() {
    let store = store_with_run("run1");
    let run_id = RunId::new("run1");
    store
        .add_workflow(
            &run_id,
            &[
                ready_task("a", "echo a", "local.fake"),
                ready_task("b", "echo b", "local.fake"),
            ],
        )
        .unwrap();

    let fake = FakeOperator::default();
    let registry = fake_registry(fake.clone());
    let handle = RunHandle {
        run_id: run_id.clone(),
        workspace_slug: "ws".to_string(),
        run_root: std::path::PathBuf::from("/tmp/matterstack-lifecycle-test"),
        db_path: std::path::PathBuf::from(":memory:"),
        clock: std::sync::Arc::new(FakeClock::new()),
        id_gen: std::sync::Arc::new(SequentialIdGen::new("att")),
    };
    let mut config = RunConfig::default();
    config.max_concurrent_global = 1;
    let default_key = OperatorKey::parse("local.fake").unwrap();

    let progressed = execute_phase(&store, &registry, &ctx(), &handle, &config, &default_key)
        .await
        .unwrap();
    assert!(progressed);

    let tasks = store.get_tasks(&run_id).unwrap();
    let submitted = tasks.iter().filter(|t| t.logical_status == TaskStatus::Submitted).count();
    let ready = tasks.iter().filter(|t| t.logical_status == TaskStatus::Ready).count();
    assert_eq!(submitted, 1, "global cap of 1 should admit exactly one task");
    assert_eq!(ready, 1, "the second task stays READY for the next tick");
}

#[tokio::test]
async fn execute_phase_fails_init_for_unregistered_operator_key() {
    let store = store_with_run("run1");
    let run_id = RunId::new("run1");
    store.add_workflow(&run_id, &[ready_task("a", "echo a", "hpc.default")]).unwrap();

    let registry = OperatorRegistry::from_map(HashMap::new());
    let handle = RunHandle {
        run_id: run_id.clone(),
        workspace_slug: "ws".to_string(),
        run_root: std::path::PathBuf::from("/tmp/matterstack-lifecycle-test"),
        db_path: std::path::PathBuf::from(":memory:"),
        clock: std::sync::Arc::new(FakeClock::new()),
        id_gen: std::sync::Arc::new(SequentialIdGen::new("att")),
    };
    let config = RunConfig::default();
    let default_key = OperatorKey::parse("local.fake").unwrap();

    execute_phase(&store, &registry, &ctx(), &handle, &config, &default_key)
        .await
        .unwrap();

    let task = store.get_tasks(&run_id).unwrap().remove(0);
    assert_eq!(task.logical_status, TaskStatus::Failed);
    let attempts = store.list_attempts(&run_id, &TaskId::new("a")).unwrap();
    assert_eq!(attempts[0].status, AttemptStatus::FailedInit);
}

#[test]
fn analyze_phase_advances_campaign_state_and_completes_when_plan_is_none() {
    let store = store_with_run("run1");
    let run_id = RunId::new("run1");
    let mut task = ready_task("a", "echo a", "local.fake");
    task.logical_status = TaskStatus::Completed;
    store.add_workflow(&run_id, &[task]).unwrap();
    store.set_campaign_state(&run_id, &Value::Null, 0).unwrap();

    let campaign = OneShotCampaign;
    let status = analyze_phase(&store, &run_id, &campaign, 1).unwrap();
    assert_eq!(status, Some(RunStatus::Completed));

    let state = store.get_campaign_state(&run_id).unwrap().unwrap();
    assert_eq!(state, json!({ "seen": 1 }));
}

#[test]
fn analyze_phase_fails_run_when_a_required_task_fails() {
    let store = store_with_run("run1");
    let run_id = RunId::new("run1");
    let mut task = ready_task("a", "echo a", "local.fake");
    task.logical_status = TaskStatus::Failed;
    store.add_workflow(&run_id, &[task]).unwrap();

    let status = analyze_phase(&store, &run_id, &OneShotCampaign, 1).unwrap();
    assert_eq!(status, Some(RunStatus::Failed));
    assert_eq!(store.get_run_status(&run_id).unwrap(), RunStatus::Failed);
}

#[test]
fn pause_then_resume_round_trips_run_status() {
    let store = store_with_run("run1");
    let run_id = RunId::new("run1");
    store.set_run_status(&run_id, RunStatus::Running, None).unwrap();
    let clock = FakeClock::new();

    pause(&store, &run_id, "operator", &clock).unwrap();
    assert_eq!(store.get_run_status(&run_id).unwrap(), RunStatus::Paused);

    resume(&store, &run_id, "operator", &clock).unwrap();
    assert_eq!(store.get_run_status(&run_id).unwrap(), RunStatus::Running);

    let events = store.list_events(&run_id).unwrap();
    assert_eq!(events.len(), 2);
}

#[test]
fn cancel_records_reason_and_terminal_status() {
    let store = store_with_run("run1");
    let run_id = RunId::new("run1");
    let clock = FakeClock::new();

    cancel(&store, &run_id, "operator requested stop", "operator", &clock).unwrap();

    let run = store.get_run(&run_id).unwrap().unwrap();
    assert_eq!(run.status, RunStatus::Cancelled);
    assert_eq!(run.status_reason.as_deref(), Some("operator requested stop"));
}

#[test]
fn rerun_recursive_resets_dependent_tasks_to_pending() {
    let store = store_with_run("run1");
    let run_id = RunId::new("run1");
    let mut a = ready_task("a", "echo a", "local.fake");
    a.logical_status = TaskStatus::Failed;
    let mut b = ready_task("b", "echo b", "local.fake");
    b.dependencies = std::collections::BTreeSet::from([TaskId::new("a")]);
    b.logical_status = TaskStatus::Completed;
    store.add_workflow(&run_id, &[a, b]).unwrap();

    let clock = FakeClock::new();
    rerun(&store, &run_id, &TaskId::new("a"), true, "operator", &clock).unwrap();

    let tasks = store.get_tasks(&run_id).unwrap();
    for task in tasks {
        assert_eq!(task.logical_status, TaskStatus::Pending, "{} should be reset", task.task_id);
    }
}

#[tokio::test]
async fn cancel_attempt_invokes_operator_cancel_and_settles_cancelled() {
    let store = store_with_run("run1");
    let run_id = RunId::new("run1");
    let mut task = ready_task("a", "echo a", "local.fake");
    task.logical_status = TaskStatus::Submitted;
    store.add_workflow(&run_id, &[task]).unwrap();

    let attempt = created_attempt("att-1", "a", "run1", "local.fake");
    store
        .create_attempt(
            &attempt.attempt_id,
            &attempt.task_id,
            &run_id,
            &attempt.operator_key,
            &attempt.operator_data,
            &attempt.config_hash,
            &attempt.config_files,
            &attempt.evidence_local_path,
            None,
            attempt.created_at,
        )
        .unwrap();
    store
        .update_attempt(
            &attempt.attempt_id,
            AttemptUpdate {
                status: Some(AttemptStatus::Submitted),
                ..Default::default()
            },
        )
        .unwrap();

    let fake = FakeOperator::default();
    let clock = FakeClock::new();
    cancel_attempt(
        &store,
        &run_id,
        &TaskId::new("a"),
        &attempt.attempt_id,
        &fake,
        &ctx(),
        "operator",
        &clock,
    )
    .await
    .unwrap();

    assert!(matches!(fake.calls().last(), Some(OperatorCall::Cancel { .. })));
    let attempts = store.list_attempts(&run_id, &TaskId::new("a")).unwrap();
    assert_eq!(attempts[0].status, AttemptStatus::Cancelled);
}
