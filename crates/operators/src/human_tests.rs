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
async fn prepare_writes_instructions_and_schema() {
    let run_root = tempfile::tempdir().unwrap();
    let ctx = ctx(run_root.path());
    let task = ready_task("review1", "inspect the synthesis log", "human.default");
    let mut attempt = created_attempt("a1", "review1", "20260101_000000_aaaaaaaa", "human.default");
    let op = HumanOperator::new(None);

    op.prepare(&ctx, &task, &mut attempt).await.unwrap();

    let dir = run_root.path().join("tasks/review1/attempts/a1");
    assert!(dir.join("instructions.md").exists());
    assert!(dir.join("schema.json").exists());
}

#[tokio::test]
async fn check_is_pending_without_a_response() {
    let run_root = tempfile::tempdir().unwrap();
    let ctx = ctx(run_root.path());
    let task = ready_task("review1", "inspect", "human.default");
    let mut attempt = created_attempt("a1", "review1", "20260101_000000_aaaaaaaa", "human.default");
    let op = HumanOperator::new(None);
    op.prepare(&ctx, &task, &mut attempt).await.unwrap();

    let status = op.check(&ctx, &attempt).await.unwrap();
    assert_eq!(status, ExternalStatus::Pending);
}

#[tokio::test]
async fn check_succeeds_on_success_response() {
    let run_root = tempfile::tempdir().unwrap();
    let ctx = ctx(run_root.path());
    let task = ready_task("review1", "inspect", "human.default");
    let mut attempt = created_attempt("a1", "review1", "20260101_000000_aaaaaaaa", "human.default");
    let op = HumanOperator::new(None);
    op.prepare(&ctx, &task, &mut attempt).await.unwrap();

    let dir = run_root.path().join("tasks/review1/attempts/a1");
    tokio::fs::write(dir.join("response.json"), r#"{"status": "success", "data": {"approved": true}}"#)
        .await
        .unwrap();

    let status = op.check(&ctx, &attempt).await.unwrap();
    assert_eq!(status, ExternalStatus::Succeeded);

    op.collect(&ctx, &mut attempt).await.unwrap();
    assert_eq!(attempt.operator_data["approved"], serde_json::json!(true));
}

#[tokio::test]
async fn check_fails_fast_on_malformed_response() {
    let run_root = tempfile::tempdir().unwrap();
    let ctx = ctx(run_root.path());
    let task = ready_task("review1", "inspect", "human.default");
    let mut attempt = created_attempt("a1", "review1", "20260101_000000_aaaaaaaa", "human.default");
    let op = HumanOperator::new(None);
    op.prepare(&ctx, &task, &mut attempt).await.unwrap();

    let dir = run_root.path().join("tasks/review1/attempts/a1");
    tokio::fs::write(dir.join("response.json"), "not json").await.unwrap();

    let err = op.check(&ctx, &attempt).await.unwrap_err();
    assert!(matches!(err, OperatorError::ManifestValidation(_)));
}

#[tokio::test]
async fn prepare_mirrors_to_review_root_when_configured() {
    let run_root = tempfile::tempdir().unwrap();
    let review_root = tempfile::tempdir().unwrap();
    let ctx = ctx(run_root.path());
    let task = ready_task("review1", "inspect", "human.default");
    let mut attempt = created_attempt("a1", "review1", "20260101_000000_aaaaaaaa", "human.default");
    let op = HumanOperator::new(Some(review_root.path().to_path_buf()));

    op.prepare(&ctx, &task, &mut attempt).await.unwrap();

    assert!(review_root.path().join("review1/a1/instructions.md").exists());
}
