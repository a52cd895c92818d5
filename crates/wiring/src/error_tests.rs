// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn override_refused_maps_to_wiring_override() {
    let err = WiringError::OverrideRefused {
        existing_hash: "aaa".to_string(),
        new_hash: "bbb".to_string(),
    };
    let engine_err: ms_core::EngineError = err.into();
    assert_eq!(engine_err.exit_code(), 5);
}

#[test]
fn missing_backend_maps_to_manifest_validation() {
    let err = WiringError::MissingBackend("hpc.default".to_string());
    let engine_err: ms_core::EngineError = err.into();
    assert_eq!(engine_err.exit_code(), 2);
    assert!(!engine_err.is_process_fatal());
}
