// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use ms_core::test_support::{created_attempt, ready_task, sample_run};
use ms_core::{OperatorKey, Task, TaskId};
use ms_storage::StateStore;
use std::collections::BTreeSet;

fn store_with_run(run_id: &str) -> StateStore {
    let store = StateStore::open_in_memory().unwrap();
    store.create_run(&sample_run(run_id, "ws")).unwrap();
    store
}

#[test]
fn pending_task_reports_blocking_dependencies() {
    let store = store_with_run("run1");
    let run_id = RunId::new("run1");
    let mut blocked = Task::new(TaskId::new("b"), "echo b");
    blocked.dependencies = BTreeSet::from([TaskId::new("a")]);
    let upstream = Task::new(TaskId::new("a"), "echo a");
    store.add_workflow(&run_id, &[upstream, blocked]).unwrap();

    let entries = frontier(&store, &run_id).unwrap();
    let blocked_entry = entries.iter().find(|e| e.task_id == TaskId::new("b")).unwrap();
    assert!(matches!(
        &blocked_entry.classification,
        TaskClassification::WaitingDependency { blocking } if blocking == &vec![TaskId::new("a")]
    ));
}

#[test]
fn ready_task_reports_ready() {
    let store = store_with_run("run1");
    let run_id = RunId::new("run1");
    store.add_workflow(&run_id, &[ready_task("a", "echo a", "local.default")]).unwrap();

    let entries = frontier(&store, &run_id).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].classification, TaskClassification::Ready);
}

#[test]
fn human_attempt_in_flight_reports_waiting_external_with_hint() {
    let store = store_with_run("run1");
    let run_id = RunId::new("run1");
    let mut task = ready_task("a", "echo a", "human.reviewer");
    task.logical_status = TaskStatus::Submitted;
    store.add_workflow(&run_id, &[task]).unwrap();

    let attempt = created_attempt("att-1", "a", "run1", "human.reviewer");
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

    let entries = frontier(&store, &run_id).unwrap();
    assert_eq!(entries.len(), 1);
    match &entries[0].classification {
        TaskClassification::WaitingExternal { operator_key, .. } => {
            assert_eq!(operator_key, &OperatorKey::parse("human.reviewer").unwrap());
        }
        other => panic!("expected WaitingExternal, got {other:?}"),
    }
    assert!(entries[0].hint.contains("human review"));
}

#[test]
fn completed_and_accepted_failed_tasks_are_excluded() {
    let store = store_with_run("run1");
    let run_id = RunId::new("run1");
    let mut done = Task::new(TaskId::new("done"), "echo");
    done.logical_status = TaskStatus::Completed;
    let mut allowed_fail = Task::new(TaskId::new("allowed"), "false");
    allowed_fail.allow_failure = true;
    allowed_fail.logical_status = TaskStatus::Failed;
    store.add_workflow(&run_id, &[done, allowed_fail]).unwrap();

    let entries = frontier(&store, &run_id).unwrap();
    assert!(entries.is_empty());
}
