// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Canonical operator routing keys (`kind.name`, e.g. `hpc.default`).

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The four operator kinds a wiring config entry may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperatorKind {
    Hpc,
    Local,
    Human,
    Experiment,
}

impl OperatorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperatorKind::Hpc => "hpc",
            OperatorKind::Local => "local",
            OperatorKind::Human => "human",
            OperatorKind::Experiment => "experiment",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "hpc" => Some(OperatorKind::Hpc),
            "local" => Some(OperatorKind::Local),
            "human" => Some(OperatorKind::Human),
            "experiment" => Some(OperatorKind::Experiment),
            _ => None,
        }
    }

    /// Is this a compute kind (drives a backend that executes a shell command)?
    pub fn is_compute(&self) -> bool {
        matches!(self, OperatorKind::Hpc | OperatorKind::Local)
    }
}

impl fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors validating an operator key (`"<kind>.<name>"`).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OperatorKeyError {
    #[error("operator key \"{0}\" has no '.' separator between kind and name")]
    MissingSeparator(String),
    #[error("operator key \"{0}\" contains whitespace")]
    Whitespace(String),
    #[error("operator key \"{0}\" kind must match [a-z][a-z0-9_]*")]
    InvalidKind(String),
    #[error("operator key \"{0}\" name must match [a-z0-9][a-z0-9_.-]*")]
    InvalidName(String),
    #[error("unknown operator kind \"{0}\"")]
    UnknownKind(String),
}

fn is_valid_kind(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

fn is_valid_name(s: &str) -> bool {
    if s.is_empty() {
        return false;
    }
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() || c.is_ascii_digit() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '_' | '.' | '-'))
}

/// A canonical `"<kind>.<name>"` operator routing key, e.g. `hpc.default`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OperatorKey {
    raw: String,
    kind: OperatorKind,
}

impl OperatorKey {
    /// Parse and validate a raw `"kind.name"` string per spec §4.2.
    ///
    /// Splits on the *first* dot only, so names may themselves contain dots
    /// (`hpc.cluster.a`'s name is `cluster.a`).
    pub fn parse(raw: &str) -> Result<Self, OperatorKeyError> {
        if raw.chars().any(char::is_whitespace) {
            return Err(OperatorKeyError::Whitespace(raw.to_string()));
        }
        let (kind_str, name) = raw
            .split_once('.')
            .ok_or_else(|| OperatorKeyError::MissingSeparator(raw.to_string()))?;
        if !is_valid_kind(kind_str) {
            return Err(OperatorKeyError::InvalidKind(raw.to_string()));
        }
        if name.contains("..") || !is_valid_name(name) {
            return Err(OperatorKeyError::InvalidName(raw.to_string()));
        }
        let kind = OperatorKind::parse(kind_str)
            .ok_or_else(|| OperatorKeyError::UnknownKind(kind_str.to_string()))?;
        Ok(Self {
            raw: raw.to_string(),
            kind,
        })
    }

    pub fn kind(&self) -> OperatorKind {
        self.kind
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Build a canonical key from validated parts (used by the registry
    /// when constructing keys it already knows to be well-formed).
    pub fn new_unchecked(kind: OperatorKind, name: &str) -> Self {
        Self {
            raw: format!("{}.{}", kind.as_str(), name),
            kind,
        }
    }
}

impl TryFrom<String> for OperatorKey {
    type Error = OperatorKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<OperatorKey> for String {
    fn from(value: OperatorKey) -> Self {
        value.raw
    }
}

impl fmt::Display for OperatorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// Legacy single-backend operator-type strings mapped to canonical keys,
/// per the v3 state-store migration and §4.3's legacy-alias lookup.
pub fn legacy_alias_to_key(legacy: &str) -> Option<OperatorKey> {
    match legacy {
        "HPC" => Some(OperatorKey::new_unchecked(OperatorKind::Hpc, "default")),
        "LOCAL" => Some(OperatorKey::new_unchecked(OperatorKind::Local, "default")),
        "HUMAN" => Some(OperatorKey::new_unchecked(OperatorKind::Human, "default")),
        "EXPERIMENT" => Some(OperatorKey::new_unchecked(
            OperatorKind::Experiment,
            "default",
        )),
        _ => None,
    }
}

#[cfg(test)]
#[path = "operator_key_tests.rs"]
mod tests;
