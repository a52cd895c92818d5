// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::tempdir;

#[test]
fn path_for_db_adds_lock_suffix() {
    let db = PathBuf::from("/data/run/state.sqlite");
    assert_eq!(RunLock::path_for_db(&db), PathBuf::from("/data/run/state.sqlite.lock"));
}

#[test]
fn second_acquire_is_rejected_while_first_is_held() {
    let dir = tempdir().unwrap();
    let lock_path = dir.path().join("state.sqlite.lock");

    let first = RunLock::try_acquire(lock_path.clone()).unwrap();
    let second = RunLock::try_acquire(lock_path.clone());
    assert!(second.is_err());
    drop(first);

    // Released once the first guard drops.
    let third = RunLock::try_acquire(lock_path);
    assert!(third.is_ok());
}

#[test]
fn writes_current_pid_into_lock_file() {
    let dir = tempdir().unwrap();
    let lock_path = dir.path().join("state.sqlite.lock");
    let _guard = RunLock::try_acquire(lock_path.clone()).unwrap();
    let contents = std::fs::read_to_string(&lock_path).unwrap();
    assert_eq!(contents.trim(), std::process::id().to_string());
}
