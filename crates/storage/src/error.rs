// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the state store and run lock.

use thiserror::Error;

/// Errors raised by the `SQLite`-backed state store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io error: {0}")]
    Io(String),
    #[error("storage db error: {0}")]
    Db(String),
    #[error("storage corruption: {0}")]
    Corrupt(String),
    #[error("storage schema version error: {0}")]
    SchemaVersion(String),
    #[error("storage invalid data: {0}")]
    Invalid(String),
    #[error("run not found: {0}")]
    RunNotFound(String),
    #[error("task not found: {0}")]
    TaskNotFound(String),
    #[error("attempt not found: {0}")]
    AttemptNotFound(String),
    #[error("attempt {0} is terminal; only its reason may be appended")]
    AttemptTerminal(String),
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        StorageError::Db(err.to_string())
    }
}

impl From<StorageError> for ms_core::EngineError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::SchemaVersion(msg) => ms_core::EngineError::SchemaVersion(msg),
            other => ms_core::EngineError::TransientBackend(other.to_string()),
        }
    }
}

/// Errors acquiring the per-run exclusive lock.
#[derive(Debug, Error)]
pub enum RunLockError {
    #[error("run lock already held: {0}")]
    Held(String),
    #[error("run lock io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<RunLockError> for ms_core::EngineError {
    fn from(err: RunLockError) -> Self {
        ms_core::EngineError::LockHeld(err.to_string())
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
