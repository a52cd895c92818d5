// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::tempdir;

#[test]
fn default_has_sane_caps() {
    let config = RunConfig::default();
    assert_eq!(config.max_concurrent_global, 8);
    assert!(config.max_concurrent_per_operator.is_empty());
    assert_eq!(config.mode, RunMode::Normal);
    assert_eq!(config.default_operator_key, "local.default");
}

#[test]
fn cap_for_falls_back_to_global() {
    let mut config = RunConfig::default();
    config.max_concurrent_global = 4;
    config.max_concurrent_per_operator.insert("hpc.default".to_string(), 2);
    assert_eq!(config.cap_for("hpc.default"), 2);
    assert_eq!(config.cap_for("local.default"), 4);
}

#[test]
fn load_missing_file_returns_default() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    let config = RunConfig::load(&path).unwrap();
    assert_eq!(config.max_concurrent_global, RunConfig::default().max_concurrent_global);
}

#[test]
fn save_then_load_round_trips() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    let mut config = RunConfig::default();
    config.max_concurrent_global = 16;
    config.default_operator_key = "hpc.default".to_string();
    config.save(&path).unwrap();

    let loaded = RunConfig::load(&path).unwrap();
    assert_eq!(loaded.max_concurrent_global, 16);
    assert_eq!(loaded.default_operator_key, "hpc.default");
}

#[test]
fn load_rejects_malformed_json() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, "not json").unwrap();
    assert!(RunConfig::load(&path).is_err());
}
