// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn schema_version_maps_to_engine_schema_version() {
    let storage_err = StorageError::SchemaVersion("found v9, max known v4".to_string());
    let engine_err: ms_core::EngineError = storage_err.into();
    assert!(engine_err.is_process_fatal());
}

#[test]
fn other_storage_errors_map_to_transient_backend() {
    let storage_err = StorageError::Db("disk full".to_string());
    let engine_err: ms_core::EngineError = storage_err.into();
    assert!(!engine_err.is_process_fatal());
    assert_eq!(engine_err.exit_code(), 2);
}

#[test]
fn run_lock_error_maps_to_lock_held() {
    let lock_err = RunLockError::Held("pid 4242".to_string());
    let engine_err: ms_core::EngineError = lock_err.into();
    assert_eq!(engine_err.exit_code(), 3);
}
