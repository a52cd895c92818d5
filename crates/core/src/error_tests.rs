// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[parameterized(
    lock_held = { EngineError::LockHeld("pid 123".into()), 3 },
    schema_version = { EngineError::SchemaVersion("found v5".into()), 4 },
    wiring_override = { EngineError::WiringOverride("run already wired".into()), 5 },
    attempt_failed = { EngineError::AttemptFailed("nonzero exit".into()), 2 },
    unknown_key = { EngineError::UnknownOperatorKey("gpu.x".into()), 2 },
)]
fn exit_code_matches_control_surface_contract(err: EngineError, expected: i32) {
    assert_eq!(err.exit_code(), expected);
}

#[test]
fn only_schema_version_is_process_fatal() {
    assert!(EngineError::SchemaVersion("x".into()).is_process_fatal());
    assert!(!EngineError::TransientBackend("x".into()).is_process_fatal());
    assert!(!EngineError::LockHeld("x".into()).is_process_fatal());
}
