// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use ms_core::test_support::{created_attempt, ready_task};
use ms_core::RunId;

fn ctx(run_root: &std::path::Path) -> OperatorContext {
    OperatorContext {
        run_id: RunId::new("20260101_000000_aaaaaaaa"),
        workspace_slug: "demo".to_string(),
        run_root: run_root.to_path_buf(),
    }
}

#[tokio::test]
async fn prepare_writes_experiment_request() {
    let run_root = tempfile::tempdir().unwrap();
    let ctx = ctx(run_root.path());
    let task = ready_task("synth1", "run synthesis protocol A", "experiment.default");
    let mut attempt = created_attempt("a1", "synth1", "20260101_000000_aaaaaaaa", "experiment.default");
    let op = ExperimentOperator::new(None);

    op.prepare(&ctx, &task, &mut attempt).await.unwrap();

    let dir = run_root.path().join("tasks/synth1/attempts/a1");
    assert!(dir.join("experiment_request.json").exists());
}

#[tokio::test]
async fn check_succeeds_on_success_result() {
    let run_root = tempfile::tempdir().unwrap();
    let ctx = ctx(run_root.path());
    let task = ready_task("synth1", "run protocol", "experiment.default");
    let mut attempt = created_attempt("a1", "synth1", "20260101_000000_aaaaaaaa", "experiment.default");
    let op = ExperimentOperator::new(None);
    op.prepare(&ctx, &task, &mut attempt).await.unwrap();

    let dir = run_root.path().join("tasks/synth1/attempts/a1");
    tokio::fs::write(
        dir.join("experiment_result.json"),
        r#"{"status": "success", "data": {"yield_pct": 87.5}}"#,
    )
    .await
    .unwrap();

    let status = op.check(&ctx, &attempt).await.unwrap();
    assert_eq!(status, ExternalStatus::Succeeded);

    op.collect(&ctx, &mut attempt).await.unwrap();
    assert_eq!(attempt.operator_data["yield_pct"], serde_json::json!(87.5));
}

#[tokio::test]
async fn collect_fails_attempt_on_failed_result() {
    let run_root = tempfile::tempdir().unwrap();
    let ctx = ctx(run_root.path());
    let task = ready_task("synth1", "run protocol", "experiment.default");
    let mut attempt = created_attempt("a1", "synth1", "20260101_000000_aaaaaaaa", "experiment.default");
    let op = ExperimentOperator::new(None);
    op.prepare(&ctx, &task, &mut attempt).await.unwrap();

    let dir = run_root.path().join("tasks/synth1/attempts/a1");
    tokio::fs::write(
        dir.join("experiment_result.json"),
        r#"{"status": "failed", "reason": "instrument fault E22"}"#,
    )
    .await
    .unwrap();

    let err = op.collect(&ctx, &mut attempt).await.unwrap_err();
    assert!(matches!(err, OperatorError::AttemptFailed(reason) if reason.contains("E22")));
}
