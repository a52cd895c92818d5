// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::operator_key::OperatorKey;
use serde_json::json;

fn sample_attempt() -> Attempt {
    Attempt {
        attempt_id: AttemptId::new("20260101_000000_aaaaaaaa"),
        task_id: TaskId::new("relax_cell"),
        run_id: RunId::new("20260101_000000_bbbbbbbb"),
        attempt_index: 1,
        status: AttemptStatus::Created,
        external_id: None,
        operator_key: OperatorKey::parse("hpc.default").unwrap(),
        operator_data: json!({}),
        workdir_remote: None,
        evidence_local_path: PathBuf::from("tasks/relax_cell/attempts/20260101_000000_aaaaaaaa"),
        config_hash: "deadbeef".to_string(),
        config_files: vec![],
        created_at: 0,
        submitted_at: None,
        ended_at: None,
        reason: None,
    }
}

#[test]
fn terminal_statuses_match_spec_enumeration() {
    assert!(AttemptStatus::Completed.is_terminal());
    assert!(AttemptStatus::Failed.is_terminal());
    assert!(AttemptStatus::FailedInit.is_terminal());
    assert!(AttemptStatus::Cancelled.is_terminal());
    assert!(!AttemptStatus::Created.is_terminal());
    assert!(!AttemptStatus::Submitted.is_terminal());
    assert!(!AttemptStatus::Running.is_terminal());
    assert!(!AttemptStatus::WaitingExternal.is_terminal());
}

#[test]
fn append_reason_joins_with_semicolon() {
    let mut attempt = sample_attempt();
    attempt.append_reason("walltime exceeded");
    assert_eq!(attempt.reason.as_deref(), Some("walltime exceeded"));
    attempt.append_reason("evidence scrape failed");
    assert_eq!(
        attempt.reason.as_deref(),
        Some("walltime exceeded; evidence scrape failed")
    );
}

#[test]
fn external_status_round_trips_through_json() {
    for status in [
        ExternalStatus::Pending,
        ExternalStatus::Succeeded,
        ExternalStatus::Failed,
        ExternalStatus::Killed,
        ExternalStatus::Unreachable,
        ExternalStatus::Unknown,
    ] {
        let encoded = serde_json::to_string(&status).unwrap();
        let decoded: ExternalStatus = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, status);
    }
}
