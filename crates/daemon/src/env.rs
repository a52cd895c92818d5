// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon crate. Workspace
//! and operator-config discovery are shared with `ms-cli` via
//! `ms_engine::env`; these are the daemon-only knobs.

use std::path::PathBuf;
use std::time::Duration;

/// Directory for the daemon's rotated log file:
/// `MATTERSTACK_DAEMON_LOG_DIR`, or `~/.local/state/matterstack/log`.
pub fn log_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("MATTERSTACK_DAEMON_LOG_DIR") {
        return PathBuf::from(dir);
    }
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".local/state/matterstack/log")
}

/// How long a cycle with no progress across any run sleeps before the next
/// scan: `MATTERSTACK_DAEMON_POLL_MS`, or 2000ms.
pub fn poll_interval() -> Duration {
    std::env::var("MATTERSTACK_DAEMON_POLL_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or_else(|| Duration::from_millis(2000))
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
