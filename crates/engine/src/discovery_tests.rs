// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn touch_run(workspaces_dir: &Path, slug: &str, run_id: &str) {
    let run_root = workspaces_dir.join(slug).join("runs").join(run_id);
    std::fs::create_dir_all(&run_root).unwrap();
    std::fs::write(run_root.join("state.db"), b"").unwrap();
}

#[test]
fn list_run_roots_finds_every_run_across_workspaces() {
    let dir = tempfile::tempdir().unwrap();
    touch_run(dir.path(), "alpha", "run1");
    touch_run(dir.path(), "beta", "run2");

    let mut found = list_run_roots(dir.path());
    found.sort_by(|a, b| a.run_id.cmp(&b.run_id));
    assert_eq!(found.len(), 2);
    assert_eq!(found[0].workspace_slug, "alpha");
    assert_eq!(found[1].workspace_slug, "beta");
}

#[test]
fn list_run_roots_ignores_directories_without_a_state_db() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("alpha/runs/incomplete")).unwrap();

    assert!(list_run_roots(dir.path()).is_empty());
}

#[test]
fn list_run_roots_on_missing_workspaces_dir_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    assert!(list_run_roots(&dir.path().join("does-not-exist")).is_empty());
}

#[test]
fn find_run_locates_by_id_without_a_known_slug() {
    let dir = tempfile::tempdir().unwrap();
    touch_run(dir.path(), "alpha", "run1");

    let found = find_run(dir.path(), "run1").unwrap();
    assert_eq!(found.workspace_slug, "alpha");
    assert_eq!(found.run_root, dir.path().join("alpha/runs/run1"));
    assert!(find_run(dir.path(), "missing").is_none());
}
