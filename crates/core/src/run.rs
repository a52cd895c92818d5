// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run: one execution of a campaign workflow against a workspace.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

crate::define_id! {
    /// Chronologically-sortable identifier for a run.
    pub struct RunId;
}

/// Lifecycle status of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    Pending,
    Running,
    Paused,
    Cancelled,
    Completed,
    Failed,
}

impl RunStatus {
    /// A run in a terminal status never transitions without an explicit
    /// `revive` control command.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunStatus::Cancelled | RunStatus::Completed | RunStatus::Failed
        )
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RunStatus::Pending => "PENDING",
            RunStatus::Running => "RUNNING",
            RunStatus::Paused => "PAUSED",
            RunStatus::Cancelled => "CANCELLED",
            RunStatus::Completed => "COMPLETED",
            RunStatus::Failed => "FAILED",
        };
        write!(f, "{s}")
    }
}

/// One execution of a campaign's workflow against a workspace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Run {
    pub run_id: RunId,
    pub workspace_slug: String,
    pub root_path: PathBuf,
    pub status: RunStatus,
    pub status_reason: Option<String>,
    pub created_at: i64,
}

impl Run {
    pub fn new(run_id: RunId, workspace_slug: impl Into<String>, root_path: PathBuf, created_at: i64) -> Self {
        Self {
            run_id,
            workspace_slug: workspace_slug.into(),
            root_path,
            status: RunStatus::Pending,
            status_reason: None,
            created_at,
        }
    }

    /// Directory housing this run's on-disk state, per the run directory layout.
    pub fn run_root(&self) -> PathBuf {
        self.root_path
            .join("workspaces")
            .join(&self.workspace_slug)
            .join("runs")
            .join(self.run_id.as_str())
    }

    pub fn tasks_dir(&self) -> PathBuf {
        self.run_root().join("tasks")
    }

    pub fn operators_snapshot_dir(&self) -> PathBuf {
        self.run_root().join("operators_snapshot")
    }
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
