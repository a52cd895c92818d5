// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors for operator wiring config parsing and resolution.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WiringError {
    #[error("failed to read operator config at {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse operator config as YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid operator key \"{0}\": {1}")]
    InvalidKey(String, #[source] ms_core::OperatorKeyError),

    #[error("operator entry \"{key}\" declares kind \"{declared}\" but its key implies kind \"{implied}\"")]
    KindMismatch {
        key: String,
        declared: String,
        implied: String,
    },

    #[error("compute operator \"{0}\" is missing a backend")]
    MissingBackend(String),

    #[error("no operator config resolvable: no explicit path, run snapshot, workspace default, or env var found, and no legacy fallback applies")]
    NoSourceResolvable,

    #[error("operator wiring for this run is already pinned to {existing_hash}; refusing override to {new_hash} without force")]
    OverrideRefused {
        existing_hash: String,
        new_hash: String,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<WiringError> for ms_core::EngineError {
    fn from(err: WiringError) -> Self {
        match err {
            WiringError::OverrideRefused { .. } => ms_core::EngineError::WiringOverride(err.to_string()),
            WiringError::Read { .. } | WiringError::Io(_) => {
                ms_core::EngineError::TransientBackend(err.to_string())
            }
            WiringError::Parse(_)
            | WiringError::InvalidKey(..)
            | WiringError::KindMismatch { .. }
            | WiringError::MissingBackend(_)
            | WiringError::NoSourceResolvable => ms_core::EngineError::ManifestValidation(err.to_string()),
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
