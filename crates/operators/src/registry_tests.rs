// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use ms_wiring::parse_and_validate;

const CONFIG_YAML: &str = r#"
local.default:
  kind: local
  backend:
    type: local
hpc.cluster_a:
  kind: hpc
  backend:
    type: slurm
    host: gpu-login.example.edu
    partition: gpu
  remote_root: /scratch/matterstack
human.reviewer:
  kind: human
"#;

#[test]
fn builds_one_operator_per_entry() {
    let config = parse_and_validate(CONFIG_YAML).unwrap();
    let registry = OperatorRegistry::build(&config).unwrap();
    assert_eq!(registry.len(), 3);
}

#[test]
fn resolves_by_canonical_key() {
    let config = parse_and_validate(CONFIG_YAML).unwrap();
    let registry = OperatorRegistry::build(&config).unwrap();
    assert!(registry.resolve("hpc.cluster_a").is_some());
}

#[test]
fn resolves_legacy_alias_only_when_default_entry_exists() {
    let config = parse_and_validate(CONFIG_YAML).unwrap();
    let registry = OperatorRegistry::build(&config).unwrap();
    assert!(registry.resolve("LOCAL").is_some());
    // No hpc.default entry in this config, so the legacy alias misses.
    assert!(registry.resolve("HPC").is_none());
}

#[test]
fn slurm_backend_without_host_is_rejected() {
    let yaml = "hpc.default:\n  kind: hpc\n  backend:\n    type: slurm\n    partition: gpu\n";
    let config = parse_and_validate(yaml).unwrap();
    let err = OperatorRegistry::build(&config).unwrap_err();
    assert!(matches!(err, OperatorError::ManifestValidation(_)));
}
