// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Canonical operator wiring config schema and validation.

use crate::error::WiringError;
use indexmap::IndexMap;
use ms_core::OperatorKey;
use serde::{Deserialize, Serialize};

/// Discriminant for a compute operator's execution backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", deny_unknown_fields)]
pub enum BackendConfig {
    /// Run as a plain local subprocess.
    Local {
        #[serde(default)]
        shell: Option<String>,
    },
    /// Submit via a Slurm scheduler, reached over SSH.
    Slurm {
        #[serde(default)]
        host: Option<String>,
        #[serde(default)]
        partition: Option<String>,
        #[serde(default)]
        account: Option<String>,
        #[serde(default)]
        qos: Option<String>,
    },
    /// Reference a named site profile defined elsewhere.
    Profile { name: String },
    /// Converted from a pre-wiring legacy single-backend run.
    Legacy { legacy_type: String },
}

/// One entry in the canonical operator config mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OperatorEntryConfig {
    pub kind: String,
    #[serde(default)]
    pub backend: Option<BackendConfig>,
    #[serde(default)]
    pub max_concurrent: Option<u32>,
    #[serde(default)]
    pub remote_root: Option<String>,
    #[serde(default)]
    pub review_root: Option<String>,
    #[serde(default)]
    pub exchange_dir: Option<String>,
}

/// A fully parsed and validated operator wiring config: insertion order is
/// preserved since it determines tie-breaking for otherwise-equivalent
/// dispatch decisions.
pub type OperatorConfig = IndexMap<String, OperatorEntryConfig>;

/// Parse and validate canonical YAML bytes into an [`OperatorConfig`].
///
/// Validates every key as a well-formed `OperatorKey`, checks that each
/// entry's `kind` field agrees with its key, and requires compute kinds
/// (`hpc`, `local`) to declare a `backend`. Unknown fields anywhere fail
/// fast via `deny_unknown_fields`.
pub fn parse_and_validate(yaml: &str) -> Result<OperatorConfig, WiringError> {
    let raw: IndexMap<String, OperatorEntryConfig> = serde_yaml::from_str(yaml)?;
    for (key, entry) in &raw {
        let parsed_key =
            OperatorKey::parse(key).map_err(|e| WiringError::InvalidKey(key.clone(), e))?;
        if parsed_key.kind().as_str() != entry.kind {
            return Err(WiringError::KindMismatch {
                key: key.clone(),
                declared: entry.kind.clone(),
                implied: parsed_key.kind().as_str().to_string(),
            });
        }
        if parsed_key.kind().is_compute() && entry.backend.is_none() {
            return Err(WiringError::MissingBackend(key.clone()));
        }
    }
    Ok(raw)
}

/// Re-serialize a config to its canonical byte form, used both when
/// persisting a freshly-resolved snapshot and when hashing for comparison.
/// Canonicalization means: parse, then re-emit via `serde_yaml` with keys in
/// their original (insertion) order — this keeps semantically-identical
/// configs hashing identically regardless of incidental whitespace in the
/// source file.
pub fn canonicalize(config: &OperatorConfig) -> Result<String, WiringError> {
    Ok(serde_yaml::to_string(config)?)
}

/// Synthesize a canonical config for a workspace that has never declared
/// operator wiring, mapping the four legacy single-backend types onto
/// `<kind>.default` entries with a `legacy` backend marker.
pub fn synthesize_legacy_default() -> OperatorConfig {
    let mut map = IndexMap::new();
    map.insert(
        "hpc.default".to_string(),
        OperatorEntryConfig {
            kind: "hpc".to_string(),
            backend: Some(BackendConfig::Legacy {
                legacy_type: "HPC".to_string(),
            }),
            max_concurrent: None,
            remote_root: None,
            review_root: None,
            exchange_dir: None,
        },
    );
    map.insert(
        "local.default".to_string(),
        OperatorEntryConfig {
            kind: "local".to_string(),
            backend: Some(BackendConfig::Legacy {
                legacy_type: "LOCAL".to_string(),
            }),
            max_concurrent: None,
            remote_root: None,
            review_root: None,
            exchange_dir: None,
        },
    );
    map.insert(
        "human.default".to_string(),
        OperatorEntryConfig {
            kind: "human".to_string(),
            backend: None,
            max_concurrent: None,
            remote_root: None,
            review_root: None,
            exchange_dir: None,
        },
    );
    map.insert(
        "experiment.default".to_string(),
        OperatorEntryConfig {
            kind: "experiment".to_string(),
            backend: None,
            max_concurrent: None,
            remote_root: None,
            review_root: None,
            exchange_dir: None,
        },
    );
    map
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
