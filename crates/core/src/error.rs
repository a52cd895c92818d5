// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The error taxonomy shared across the engine, storage, wiring, and
//! operator crates. Every downstream error type maps into one of these
//! kinds at the boundary it crosses; see each variant's propagation note.

use thiserror::Error;

/// Common error kinds raised at operator, campaign, and state-store
/// boundaries. Downstream crates define their own richer error enums and
/// convert into this one where they cross into the engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Network or scheduler glitch. Logged; attempt stays in its current
    /// status; retried next tick.
    #[error("transient backend error: {0}")]
    TransientBackend(String),

    /// Operator observed a terminal external failure, or `collect` found
    /// outputs missing. Attempt moves to FAILED with `reason`.
    #[error("attempt failed: {0}")]
    AttemptFailed(String),

    /// Dispatch could not resolve an `operator_key` in the registry.
    /// Attempt moves to FAILED deterministically, never silently skipped.
    #[error("unknown operator key: {0}")]
    UnknownOperatorKey(String),

    /// Operator attempted a write outside the run root.
    #[error("path safety violation: {0}")]
    PathSafety(String),

    /// Operator parsed a malformed request or response.
    #[error("manifest validation error: {0}")]
    ManifestValidation(String),

    /// `step` could not acquire the run lock. Caller retries later.
    #[error("run lock held by another process: {0}")]
    LockHeld(String),

    /// State store found a newer, unknown schema version. Fatal for the
    /// process; no state mutation occurs.
    #[error("schema version error: {0}")]
    SchemaVersion(String),

    /// Attempt to change operator wiring on an existing run without force.
    /// Fatal for the command; run state untouched.
    #[error("wiring override refused: {0}")]
    WiringOverride(String),

    /// `plan` or `analyze` raised. Run moves to FAILED with reason.
    #[error("campaign error: {0}")]
    Campaign(String),
}

impl EngineError {
    /// Exit code per the control-surface contract (§6): 0 success is never
    /// represented here, callers return it directly on the `Ok` path.
    pub fn exit_code(&self) -> i32 {
        match self {
            EngineError::LockHeld(_) => 3,
            EngineError::SchemaVersion(_) => 4,
            EngineError::WiringOverride(_) => 5,
            EngineError::TransientBackend(_)
            | EngineError::AttemptFailed(_)
            | EngineError::UnknownOperatorKey(_)
            | EngineError::PathSafety(_)
            | EngineError::ManifestValidation(_)
            | EngineError::Campaign(_) => 2,
        }
    }

    /// Whether this kind escapes the engine's own catch-all instead of
    /// being folded into an attempt/run `reason` (§7 propagation policy).
    pub fn is_process_fatal(&self) -> bool {
        matches!(self, EngineError::SchemaVersion(_))
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
