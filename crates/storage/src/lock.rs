// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-run exclusive lock backed by a native OS file lock (`flock`), not an
//! ad-hoc PID lockfile: the lock is released automatically if the holding
//! process dies, so a crashed tick never wedges a run forever.

use crate::error::RunLockError;
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Holds an exclusive lock on a run's `.lock` file for the lifetime of one
/// tick. Dropping it releases the lock; the file itself is left behind.
pub struct RunLock {
    path: PathBuf,
    file: File,
}

impl RunLock {
    /// The sibling lock file path for a given state-store database path.
    pub fn path_for_db(db_path: &Path) -> PathBuf {
        let mut path = db_path.to_path_buf();
        let file_name = path
            .file_name()
            .map(|n| format!("{}.lock", n.to_string_lossy()))
            .unwrap_or_else(|| "state.lock".to_string());
        path.set_file_name(file_name);
        path
    }

    /// Attempt to acquire the lock without blocking. Returns
    /// `RunLockError::Held` (with the recorded holder PID, if any) when
    /// another process already holds it.
    pub fn try_acquire(path: PathBuf) -> Result<Self, RunLockError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)?;
        file.try_lock_exclusive().map_err(|_| {
            let holder = std::fs::read_to_string(&path)
                .ok()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "unknown".to_string());
            RunLockError::Held(format!("{} (held by pid {holder})", path.display()))
        })?;
        let mut file = file;
        file.set_len(0)?;
        writeln!(file, "{}", std::process::id())?;
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for RunLock {
    fn drop(&mut self) {
        let _ = fs2::FileExt::unlock(&self.file);
    }
}

#[cfg(test)]
#[path = "lock_tests.rs"]
mod tests;
