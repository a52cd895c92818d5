// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

const VALID_YAML: &str = r#"
hpc.default:
  kind: hpc
  backend:
    type: slurm
    partition: gpu
human.reviewer:
  kind: human
  review_root: /data/reviews
"#;

#[test]
fn parses_valid_config() {
    let config = parse_and_validate(VALID_YAML).unwrap();
    assert_eq!(config.len(), 2);
    assert_eq!(config["hpc.default"].kind, "hpc");
}

#[test]
fn rejects_kind_mismatch() {
    let yaml = "hpc.default:\n  kind: local\n  backend:\n    type: local\n";
    let err = parse_and_validate(yaml).unwrap_err();
    assert!(matches!(err, WiringError::KindMismatch { .. }));
}

#[test]
fn rejects_compute_kind_without_backend() {
    let yaml = "hpc.default:\n  kind: hpc\n";
    let err = parse_and_validate(yaml).unwrap_err();
    assert!(matches!(err, WiringError::MissingBackend(_)));
}

#[test]
fn rejects_unknown_field() {
    let yaml = "hpc.default:\n  kind: hpc\n  backend:\n    type: local\n  bogus_field: 1\n";
    let err = parse_and_validate(yaml);
    assert!(err.is_err());
}

#[test]
fn rejects_malformed_key() {
    let yaml = "HPC.default:\n  kind: hpc\n  backend:\n    type: local\n";
    let err = parse_and_validate(yaml).unwrap_err();
    assert!(matches!(err, WiringError::InvalidKey(..)));
}

#[test]
fn legacy_default_covers_all_four_kinds() {
    let config = synthesize_legacy_default();
    assert!(config.contains_key("hpc.default"));
    assert!(config.contains_key("local.default"));
    assert!(config.contains_key("human.default"));
    assert!(config.contains_key("experiment.default"));
}

#[test]
fn canonicalize_is_stable_across_calls() {
    let config = parse_and_validate(VALID_YAML).unwrap();
    let a = canonicalize(&config).unwrap();
    let b = canonicalize(&config).unwrap();
    assert_eq!(a, b);
}
