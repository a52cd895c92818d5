// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[parameterized(
    pending = { "PENDING", ExternalStatus::Pending },
    running = { "RUNNING", ExternalStatus::Pending },
    completed = { "COMPLETED", ExternalStatus::Succeeded },
    failed = { "FAILED", ExternalStatus::Failed },
    timeout = { "TIMEOUT", ExternalStatus::Failed },
    node_fail = { "NODE_FAIL", ExternalStatus::Failed },
    preempted = { "PREEMPTED", ExternalStatus::Failed },
    out_of_memory = { "OUT_OF_MEMORY", ExternalStatus::Failed },
    cancelled = { "CANCELLED", ExternalStatus::Killed },
    empty = { "", ExternalStatus::Unknown },
    unrecognized = { "SOME_FUTURE_STATE", ExternalStatus::Unreachable },
)]
fn maps_slurm_states(state: &str, expected: ExternalStatus) {
    assert_eq!(map_slurm_state(state), expected);
}

fn workdir_at(path: &std::path::Path) -> WorkDir {
    WorkDir {
        local: path.to_path_buf(),
        remote_relative: std::path::PathBuf::from("unused"),
    }
}

#[tokio::test]
async fn local_transport_reports_pending_before_exit_marker_exists() {
    let dir = tempfile::tempdir().unwrap();
    let transport = LocalProcessTransport::new();
    // Use our own pid so `kill -0` succeeds without spawning anything.
    let our_pid = std::process::id().to_string();
    let status = transport
        .query_status(&our_pid, &workdir_at(dir.path()))
        .await
        .unwrap();
    assert_eq!(status, ExternalStatus::Pending);
}

#[tokio::test]
async fn local_transport_reads_exit_code_marker() {
    let dir = tempfile::tempdir().unwrap();
    let workdir = workdir_at(dir.path());
    tokio::fs::write(dir.path().join("exit_code"), "0\n").await.unwrap();
    let transport = LocalProcessTransport::new();
    let status = transport.query_status("1", &workdir).await.unwrap();
    assert_eq!(status, ExternalStatus::Succeeded);

    tokio::fs::write(dir.path().join("exit_code"), "1\n").await.unwrap();
    let status = transport.query_status("1", &workdir).await.unwrap();
    assert_eq!(status, ExternalStatus::Failed);
}

#[tokio::test]
async fn local_transport_reports_unknown_for_dead_process_with_no_marker() {
    let dir = tempfile::tempdir().unwrap();
    let transport = LocalProcessTransport::new();
    // A very large, unlikely-to-exist PID reliably fails `kill -0`.
    let status = transport
        .query_status("999999999", &workdir_at(dir.path()))
        .await
        .unwrap();
    assert_eq!(status, ExternalStatus::Unknown);
}
