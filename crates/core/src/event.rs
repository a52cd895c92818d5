// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! RunEvent: append-only audit trail for manual interventions.

use crate::run::RunId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

crate::define_id! {
    /// Identifier for a run event.
    pub struct RunEventId;
}

/// The kind of manual intervention a `RunEvent` records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunEventAction {
    Revive,
    Rerun,
    Reset,
    ForcedWiringOverride,
    Pause,
    Resume,
    Cancel,
    CancelAttempt,
}

impl std::fmt::Display for RunEventAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RunEventAction::Revive => "revive",
            RunEventAction::Rerun => "rerun",
            RunEventAction::Reset => "reset",
            RunEventAction::ForcedWiringOverride => "forced_wiring_override",
            RunEventAction::Pause => "pause",
            RunEventAction::Resume => "resume",
            RunEventAction::Cancel => "cancel",
            RunEventAction::CancelAttempt => "cancel_attempt",
        };
        write!(f, "{s}")
    }
}

/// An append-only audit entry. Write-only; never mutated once recorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunEvent {
    pub event_id: RunEventId,
    pub run_id: RunId,
    pub timestamp: i64,
    pub action: RunEventAction,
    pub actor: String,
    pub payload: Value,
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
