// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Operator Registry (C3): builds one [`Operator`] per wiring entry via
//! a factory table keyed by `OperatorKind`, and resolves lookups by
//! canonical key or legacy single-backend alias. Immutable once built.

use crate::compute::ComputeOperator;
use crate::error::OperatorError;
use crate::experiment::ExperimentOperator;
use crate::human::HumanOperator;
use crate::operator::Operator;
use crate::transport::{LocalProcessTransport, SshSlurmTransport};
use ms_core::{legacy_alias_to_key, OperatorKey, OperatorKind};
use ms_wiring::{BackendConfig, OperatorConfig};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

/// An immutable map from canonical operator key to its constructed
/// [`Operator`], built once per resolved wiring snapshot.
pub struct OperatorRegistry {
    operators: HashMap<OperatorKey, Arc<dyn Operator>>,
}

fn build_compute(
    kind: OperatorKind,
    entry: &ms_wiring::OperatorEntryConfig,
) -> Result<Arc<dyn Operator>, OperatorError> {
    let backend = entry
        .backend
        .as_ref()
        .ok_or_else(|| OperatorError::ManifestValidation(format!("{kind} operator is missing a backend")))?;
    match backend {
        BackendConfig::Local { .. } => Ok(Arc::new(ComputeOperator::new(LocalProcessTransport::new(), None))),
        BackendConfig::Legacy { legacy_type } if legacy_type == "LOCAL" => {
            Ok(Arc::new(ComputeOperator::new(LocalProcessTransport::new(), None)))
        }
        BackendConfig::Slurm { host: Some(host), .. } => {
            let remote_root = entry.remote_root.clone().unwrap_or_default();
            Ok(Arc::new(ComputeOperator::new(
                SshSlurmTransport::new(host.clone(), remote_root.clone()),
                Some(remote_root),
            )))
        }
        BackendConfig::Slurm { host: None, .. } => Err(OperatorError::ManifestValidation(
            "slurm backend requires a host".to_string(),
        )),
        BackendConfig::Legacy { legacy_type } => Err(OperatorError::ManifestValidation(format!(
            "legacy backend type \"{legacy_type}\" has no compute transport without further configuration"
        ))),
        BackendConfig::Profile { name } => Err(OperatorError::ManifestValidation(format!(
            "profile backend \"{name}\" cannot be resolved without site profile data"
        ))),
    }
}

impl OperatorRegistry {
    /// Parse + validate is assumed already done by `ms_wiring`; this only
    /// instantiates operators from an already-canonical config.
    pub fn build(config: &OperatorConfig) -> Result<Self, OperatorError> {
        let mut operators = HashMap::new();
        for (raw_key, entry) in config {
            let key = OperatorKey::parse(raw_key)
                .map_err(|e| OperatorError::ManifestValidation(format!("{raw_key}: {e}")))?;
            let operator: Arc<dyn Operator> = match key.kind() {
                OperatorKind::Local | OperatorKind::Hpc => build_compute(key.kind(), entry)?,
                OperatorKind::Human => Arc::new(HumanOperator::new(entry.review_root.clone().map(PathBuf::from))),
                OperatorKind::Experiment => {
                    Arc::new(ExperimentOperator::new(entry.exchange_dir.clone().map(PathBuf::from)))
                }
            };
            operators.insert(key, operator);
        }
        Ok(Self { operators })
    }

    /// Look up by canonical `"<kind>.<name>"` key.
    pub fn get(&self, key: &OperatorKey) -> Option<&Arc<dyn Operator>> {
        self.operators.get(key)
    }

    /// Look up by canonical key string or, failing that, a legacy
    /// single-backend alias (`HPC`, `LOCAL`, `HUMAN`, `EXPERIMENT`).
    pub fn resolve(&self, raw_or_legacy: &str) -> Option<&Arc<dyn Operator>> {
        if let Ok(key) = OperatorKey::parse(raw_or_legacy) {
            if let Some(op) = self.get(&key) {
                return Some(op);
            }
        }
        legacy_alias_to_key(raw_or_legacy).and_then(|key| self.get(&key))
    }

    pub fn len(&self) -> usize {
        self.operators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }

    /// Build a registry directly from a prebuilt operator map, bypassing
    /// wiring config parsing. Lets engine tests wire in a
    /// [`FakeOperator`](crate::fake::FakeOperator) under a chosen key.
    #[cfg(any(test, feature = "test-support"))]
    pub fn from_map(operators: HashMap<OperatorKey, Arc<dyn Operator>>) -> Self {
        Self { operators }
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
