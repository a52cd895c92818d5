// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::path::Path;

#[test]
fn accepts_nested_relative_path() {
    let root = Path::new("/runs/20260101_000000_abcd1234");
    let resolved = resolve_within(root, Path::new("tasks/t1/attempts/a1/manifest.json")).unwrap();
    assert_eq!(
        resolved,
        root.join("tasks/t1/attempts/a1/manifest.json")
    );
}

#[test]
fn rejects_absolute_path() {
    let root = Path::new("/runs/abc");
    let err = resolve_within(root, Path::new("/etc/passwd")).unwrap_err();
    assert!(matches!(err, OperatorError::PathSafety { .. }));
}

#[test]
fn rejects_parent_dir_escape() {
    let root = Path::new("/runs/abc");
    let err = resolve_within(root, Path::new("../../etc/passwd")).unwrap_err();
    assert!(matches!(err, OperatorError::PathSafety { .. }));
}

#[test]
fn allows_internal_parent_dir_that_stays_contained() {
    let root = Path::new("/runs/abc");
    let resolved = resolve_within(root, Path::new("tasks/t1/../t1/manifest.json")).unwrap();
    assert_eq!(resolved, root.join("tasks/t1/manifest.json"));
}
