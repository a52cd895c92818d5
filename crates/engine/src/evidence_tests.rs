// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use ms_core::test_support::{created_attempt, ready_task, sample_run};
use ms_core::RunId;
use ms_storage::StateStore;
use tempfile::tempdir;

#[test]
fn build_bundle_fails_for_unknown_run() {
    let store = StateStore::open_in_memory().unwrap();
    let err = build_bundle(&store, &RunId::new("missing")).unwrap_err();
    assert!(matches!(err, EngineError::ManifestValidation(_)));
}

#[test]
fn build_bundle_collects_tasks_and_attempts() {
    let store = StateStore::open_in_memory().unwrap();
    let run_id = RunId::new("run1");
    store.create_run(&sample_run("run1", "ws")).unwrap();
    store
        .add_workflow(&run_id, &[ready_task("a", "echo a", "local.default")])
        .unwrap();
    let attempt = created_attempt("att-1", "a", "run1", "local.default");
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

    let bundle = build_bundle(&store, &run_id).unwrap();
    assert_eq!(bundle.run_id, run_id);
    assert_eq!(bundle.tasks.len(), 1);
    assert_eq!(bundle.tasks[0].attempts.len(), 1);
    assert_eq!(bundle.tasks[0].attempts[0].attempt_id, attempt.attempt_id);
    assert!(bundle.wiring_hash.is_none());
}

#[test]
fn export_bundle_writes_evidence_json() {
    let store = StateStore::open_in_memory().unwrap();
    let run_id = RunId::new("run1");
    store.create_run(&sample_run("run1", "ws")).unwrap();
    let bundle = build_bundle(&store, &run_id).unwrap();

    let run_root = tempdir().unwrap();
    let dest = tempdir().unwrap();
    export_bundle(&bundle, run_root.path(), dest.path()).unwrap();

    let written = std::fs::read_to_string(dest.path().join("evidence.json")).unwrap();
    assert!(written.contains("\"run_id\""));
    assert!(!dest.path().join("operators.yaml").exists());
}

#[test]
fn export_bundle_copies_pinned_wiring_snapshot() {
    let store = StateStore::open_in_memory().unwrap();
    let run_id = RunId::new("run1");
    store.create_run(&sample_run("run1", "ws")).unwrap();
    let bundle = build_bundle(&store, &run_id).unwrap();

    let run_root = tempdir().unwrap();
    let snapshot_dir = run_root.path().join("operators_snapshot");
    std::fs::create_dir_all(&snapshot_dir).unwrap();
    std::fs::write(snapshot_dir.join("operators.yaml"), "local.default:\n  kind: local\n").unwrap();

    let dest = tempdir().unwrap();
    export_bundle(&bundle, run_root.path(), dest.path()).unwrap();
    assert!(dest.path().join("operators.yaml").exists());
}
