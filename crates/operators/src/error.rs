// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors from the operator lifecycle and registry.

use thiserror::Error;

/// Errors raised by an [`Operator`](crate::operator::Operator) implementation
/// or by [`OperatorRegistry`](crate::registry::OperatorRegistry) construction.
#[derive(Debug, Error)]
pub enum OperatorError {
    #[error("transient backend error: {0}")]
    Transient(String),

    #[error("attempt failed: {0}")]
    AttemptFailed(String),

    #[error("path {attempted} escapes run root {run_root}")]
    PathSafety { run_root: String, attempted: String },

    #[error("malformed request/response: {0}")]
    ManifestValidation(String),

    #[error("unknown operator kind \"{0}\" in wiring config")]
    UnknownKind(String),

    #[error("operator key \"{0}\" not found in registry")]
    UnknownOperatorKey(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<OperatorError> for ms_core::EngineError {
    fn from(err: OperatorError) -> Self {
        match err {
            OperatorError::Transient(_) => ms_core::EngineError::TransientBackend(err.to_string()),
            OperatorError::AttemptFailed(_) => ms_core::EngineError::AttemptFailed(err.to_string()),
            OperatorError::PathSafety { .. } => ms_core::EngineError::PathSafety(err.to_string()),
            OperatorError::ManifestValidation(_) => {
                ms_core::EngineError::ManifestValidation(err.to_string())
            }
            OperatorError::UnknownKind(_) | OperatorError::UnknownOperatorKey(_) => {
                ms_core::EngineError::UnknownOperatorKey(err.to_string())
            }
            OperatorError::Io(_) | OperatorError::Json(_) => {
                ms_core::EngineError::TransientBackend(err.to_string())
            }
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
