// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run-scoped configuration (`config.json`): concurrency caps and mode.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Execution mode a run was started in. Informational today; reserved for
/// future dry-run/replay modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    #[default]
    Normal,
    DryRun,
}

/// Per-run concurrency caps, persisted at `config.json` in the run root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    pub max_concurrent_global: u32,
    #[serde(default)]
    pub max_concurrent_per_operator: HashMap<String, u32>,
    #[serde(default)]
    pub mode: RunMode,
    /// Operator key used for tasks that leave `operator_key` unset and have
    /// no `MATTERSTACK_OPERATOR` env assignment.
    #[serde(default = "default_operator_key")]
    pub default_operator_key: String,
}

fn default_operator_key() -> String {
    "local.default".to_string()
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_concurrent_global: 8,
            max_concurrent_per_operator: HashMap::new(),
            mode: RunMode::Normal,
            default_operator_key: default_operator_key(),
        }
    }
}

impl RunConfig {
    pub fn load(path: &Path) -> std::io::Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(raw) => {
                serde_json::from_str(&raw).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e),
        }
    }

    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let body =
            serde_json::to_string_pretty(self).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, body)
    }

    /// The cap for `key`, falling back to the global cap when no
    /// per-operator override is configured.
    pub fn cap_for(&self, key: &str) -> u32 {
        self.max_concurrent_per_operator
            .get(key)
            .copied()
            .unwrap_or(self.max_concurrent_global)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
