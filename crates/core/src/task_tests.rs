// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn fresh_task_is_pending_with_no_attempt() {
    let task = Task::new(TaskId::new("relax_cell"), "mpirun vasp_std");
    assert_eq!(task.logical_status, TaskStatus::Pending);
    assert!(task.current_attempt_id.is_none());
    assert!(task.dependencies.is_empty());
}

#[test]
fn dependencies_satisfied_requires_all_deps_complete() {
    let mut task = Task::new(TaskId::new("relax_ionic"), "echo step2");
    task.dependencies.insert(TaskId::new("relax_cell"));
    task.dependencies.insert(TaskId::new("generate_pseudos"));

    let mut completed = BTreeSet::new();
    completed.insert(TaskId::new("relax_cell"));
    assert!(!task.dependencies_satisfied(&completed));

    completed.insert(TaskId::new("generate_pseudos"));
    assert!(task.dependencies_satisfied(&completed));
}

#[test]
fn task_with_no_dependencies_is_always_satisfied() {
    let task = Task::new(TaskId::new("bootstrap"), "echo hi");
    assert!(task.dependencies_satisfied(&BTreeSet::new()));
}

#[test]
fn terminal_statuses() {
    assert!(TaskStatus::Completed.is_terminal());
    assert!(TaskStatus::Failed.is_terminal());
    assert!(!TaskStatus::Ready.is_terminal());
    assert!(!TaskStatus::Submitted.is_terminal());
}
