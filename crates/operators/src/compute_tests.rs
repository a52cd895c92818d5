// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::transport::LocalProcessTransport;
use ms_core::test_support::{created_attempt, ready_task};
use ms_core::RunId;

fn ctx(run_root: &Path) -> OperatorContext {
    OperatorContext {
        run_id: RunId::new("20260101_000000_aaaaaaaa"),
        workspace_slug: "demo".to_string(),
        run_root: run_root.to_path_buf(),
    }
}

#[tokio::test]
async fn prepare_writes_manifest_and_submit_script() {
    let run_root = tempfile::tempdir().unwrap();
    let ctx = ctx(run_root.path());
    let task = ready_task("t1", "echo hello", "local.default");
    let mut attempt = created_attempt("a1", "t1", "20260101_000000_aaaaaaaa", "local.default");
    let op = ComputeOperator::new(LocalProcessTransport::new(), None);

    op.prepare(&ctx, &task, &mut attempt).await.unwrap();

    let attempt_dir = run_root.path().join("tasks/t1/attempts/a1");
    assert!(attempt_dir.join("manifest.json").exists());
    let script = tokio::fs::read_to_string(attempt_dir.join("submit.sh")).await.unwrap();
    assert!(script.contains("echo hello"));
    assert!(attempt_dir.join("outputs").is_dir());
}

#[tokio::test]
async fn submit_is_idempotent_once_external_id_is_set() {
    let run_root = tempfile::tempdir().unwrap();
    let ctx = ctx(run_root.path());
    let task = ready_task("t1", "true", "local.default");
    let mut attempt = created_attempt("a1", "t1", "20260101_000000_aaaaaaaa", "local.default");
    let op = ComputeOperator::new(LocalProcessTransport::new(), None);
    op.prepare(&ctx, &task, &mut attempt).await.unwrap();

    attempt.external_id = Some("12345".to_string());
    op.submit(&ctx, &mut attempt).await.unwrap();
    assert_eq!(attempt.external_id.as_deref(), Some("12345"));
}

#[tokio::test]
async fn full_lifecycle_succeeds_for_a_trivial_command() {
    let run_root = tempfile::tempdir().unwrap();
    let ctx = ctx(run_root.path());
    let task = ready_task("t1", "echo hi", "local.default");
    let mut attempt = created_attempt("a1", "t1", "20260101_000000_aaaaaaaa", "local.default");
    let op = ComputeOperator::new(LocalProcessTransport::new(), None);

    op.prepare(&ctx, &task, &mut attempt).await.unwrap();
    op.submit(&ctx, &mut attempt).await.unwrap();
    assert!(attempt.external_id.is_some());

    // Poll until the exit_code marker lands; trivial commands finish fast.
    let mut status = ExternalStatus::Pending;
    for _ in 0..50 {
        status = op.check(&ctx, &attempt).await.unwrap();
        if status != ExternalStatus::Pending {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }
    assert_eq!(status, ExternalStatus::Succeeded);

    op.collect(&ctx, &mut attempt).await.unwrap();
    let stdout = tokio::fs::read_to_string(run_root.path().join("tasks/t1/attempts/a1/stdout.log"))
        .await
        .unwrap();
    assert!(stdout.contains("hi"));
}

#[test]
fn submit_script_redirects_and_marks_exit_code() {
    let script = write_submit_script("echo test");
    assert!(script.starts_with("#!/bin/sh"));
    assert!(script.contains("> stdout.log 2> stderr.log"));
    assert!(script.contains("echo $? > exit_code"));
}
