// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI-level errors and the exit-code mapping the control surface promises
//! (spec §6): success 0, user error 2, lock contention 3, schema error 4,
//! wiring override refused 5.

use ms_core::EngineError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),

    #[error("run not found: {0}")]
    RunNotFound(String),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Storage(#[from] ms_storage::StorageError),

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) | CliError::RunNotFound(_) => 2,
            CliError::Engine(e) => e.exit_code(),
            CliError::Storage(_) => 4,
            CliError::Io(_) => 2,
        }
    }
}
