// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn run_root_follows_workspace_layout() {
    let run = Run::new(
        RunId::new("20260101_000000_abcdefgh"),
        "crystal-lab",
        PathBuf::from("/data/matterstack"),
        0,
    );
    assert_eq!(
        run.run_root(),
        PathBuf::from("/data/matterstack/workspaces/crystal-lab/runs/20260101_000000_abcdefgh")
    );
    assert_eq!(
        run.tasks_dir(),
        run.run_root().join("tasks")
    );
}

#[test]
fn terminal_statuses() {
    assert!(RunStatus::Completed.is_terminal());
    assert!(RunStatus::Failed.is_terminal());
    assert!(RunStatus::Cancelled.is_terminal());
    assert!(!RunStatus::Running.is_terminal());
    assert!(!RunStatus::Paused.is_terminal());
}

#[test]
fn display_matches_wire_format() {
    assert_eq!(RunStatus::Pending.to_string(), "PENDING");
    assert_eq!(RunStatus::Running.to_string(), "RUNNING");
}
