// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Filesystem discovery of run roots under a workspaces directory, shared
//! by `ms-cli` (which only knows a bare `run_id`) and `ms-daemon` (which
//! must enumerate every run it might need to tick).

use std::path::{Path, PathBuf};

/// Where one run's on-disk state lives, as found by scanning
/// `<workspaces_dir>/<slug>/runs/<run_id>/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunLocation {
    pub workspace_slug: String,
    pub run_id: String,
    pub run_root: PathBuf,
}

/// List every run root under `workspaces_dir`, regardless of status. Silent
/// on a missing or unreadable `workspaces_dir` — callers that require it to
/// exist should check separately.
pub fn list_run_roots(workspaces_dir: &Path) -> Vec<RunLocation> {
    let mut out = Vec::new();
    let Ok(slugs) = std::fs::read_dir(workspaces_dir) else {
        return out;
    };
    for slug_entry in slugs.flatten() {
        if !slug_entry.path().is_dir() {
            continue;
        }
        let Some(slug) = slug_entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        let runs_dir = slug_entry.path().join("runs");
        let Ok(run_entries) = std::fs::read_dir(&runs_dir) else {
            continue;
        };
        for run_entry in run_entries.flatten() {
            let run_root = run_entry.path();
            if !run_root.join("state.db").exists() {
                continue;
            }
            let Some(run_id) = run_entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            out.push(RunLocation {
                workspace_slug: slug.clone(),
                run_id,
                run_root,
            });
        }
    }
    out
}

/// Find a single run by id without the caller already knowing its
/// workspace slug. `ms-cli`'s control-surface commands take only a
/// `run_id` per spec §6, so this is the lookup that bridges that to a run
/// root.
pub fn find_run(workspaces_dir: &Path, run_id: &str) -> Option<RunLocation> {
    list_run_roots(workspaces_dir)
        .into_iter()
        .find(|loc| loc.run_id == run_id)
}

#[cfg(test)]
#[path = "discovery_tests.rs"]
mod tests;
