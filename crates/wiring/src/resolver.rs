// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Operator Wiring Resolver (C2): precedence-based config discovery,
//! hash-pinned snapshot persistence, and the forced-override escape hatch.

use crate::config::{self, OperatorConfig};
use crate::error::WiringError;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Where a resolved wiring snapshot's bytes came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WiringSource {
    ExplicitPath,
    RunPersisted,
    WorkspaceDefault,
    EnvVar,
    Legacy,
}

/// The outcome of a resolution: where the snapshot lives, its canonical
/// hash, and where its bytes came from.
#[derive(Debug, Clone)]
pub struct ResolvedOperatorWiring {
    pub snapshot_path: PathBuf,
    pub hash: String,
    pub source: WiringSource,
    pub config: OperatorConfig,
    /// Set when this resolution was a forced override of an existing
    /// pinned snapshot; the caller should record a `RunEvent` for it.
    pub forced_override: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotMetadata {
    source: WiringSource,
    resolved_path: Option<String>,
    sha256: String,
    created_at: String,
}

#[derive(Debug, Serialize)]
struct HistoryEntry<'a> {
    timestamp: String,
    source: WiringSource,
    sha256: &'a str,
    forced: bool,
}

/// Inputs to a single resolution attempt. `explicit_path`/`force` are
/// typically only set from an operator-facing CLI flag; steady-state ticks
/// pass `None`/`false` and simply reuse whatever is already pinned.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    pub run_root: PathBuf,
    pub workspace_root: PathBuf,
    pub explicit_path: Option<PathBuf>,
    pub env_path: Option<PathBuf>,
    pub force: bool,
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

fn snapshot_dir(run_root: &Path) -> PathBuf {
    run_root.join("operators_snapshot")
}

fn read_existing_snapshot(run_root: &Path) -> Result<Option<(OperatorConfig, String)>, WiringError> {
    let path = snapshot_dir(run_root).join("operators.yaml");
    if !path.exists() {
        return Ok(None);
    }
    let yaml = std::fs::read_to_string(&path).map_err(|e| WiringError::Read {
        path: path.display().to_string(),
        source: e,
    })?;
    let config = config::parse_and_validate(&yaml)?;
    let canonical = config::canonicalize(&config)?;
    Ok(Some((config, sha256_hex(canonical.as_bytes()))))
}

fn gather_candidate(opts: &ResolveOptions) -> Result<(OperatorConfig, WiringSource), WiringError> {
    if let Some(path) = &opts.explicit_path {
        let yaml = std::fs::read_to_string(path).map_err(|e| WiringError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        return Ok((config::parse_and_validate(&yaml)?, WiringSource::ExplicitPath));
    }
    let workspace_default = opts.workspace_root.join("operators.yaml");
    if workspace_default.exists() {
        let yaml = std::fs::read_to_string(&workspace_default).map_err(|e| WiringError::Read {
            path: workspace_default.display().to_string(),
            source: e,
        })?;
        return Ok((config::parse_and_validate(&yaml)?, WiringSource::WorkspaceDefault));
    }
    if let Some(path) = &opts.env_path {
        if path.exists() {
            let yaml = std::fs::read_to_string(path).map_err(|e| WiringError::Read {
                path: path.display().to_string(),
                source: e,
            })?;
            return Ok((config::parse_and_validate(&yaml)?, WiringSource::EnvVar));
        }
    }
    Ok((config::synthesize_legacy_default(), WiringSource::Legacy))
}

fn persist_snapshot(
    run_root: &Path,
    config: &OperatorConfig,
    source: WiringSource,
    forced: bool,
) -> Result<(PathBuf, String), WiringError> {
    let dir = snapshot_dir(run_root);
    std::fs::create_dir_all(&dir)?;
    let canonical = config::canonicalize(config)?;
    let hash = sha256_hex(canonical.as_bytes());
    let snapshot_path = dir.join("operators.yaml");
    std::fs::write(&snapshot_path, &canonical)?;

    let created_at = Utc::now().to_rfc3339();
    let metadata = SnapshotMetadata {
        source,
        resolved_path: Some(snapshot_path.display().to_string()),
        sha256: hash.clone(),
        created_at: created_at.clone(),
    };
    std::fs::write(
        dir.join("metadata.json"),
        serde_json::to_string_pretty(&metadata).map_err(|e| WiringError::Io(std::io::Error::other(e)))?,
    )?;

    let history_line = serde_json::to_string(&HistoryEntry {
        timestamp: created_at,
        source,
        sha256: &hash,
        forced,
    })
    .map_err(|e| WiringError::Io(std::io::Error::other(e)))?;
    let mut history_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("history.jsonl"))?;
    writeln!(history_file, "{history_line}")?;

    Ok((snapshot_path, hash))
}

/// Resolve operator wiring for a run, following the precedence order:
/// explicit path > run-persisted snapshot > workspace default > env var >
/// synthesized legacy default.
pub fn resolve(opts: &ResolveOptions) -> Result<ResolvedOperatorWiring, WiringError> {
    if let Some((existing_config, existing_hash)) = read_existing_snapshot(&opts.run_root)? {
        if opts.explicit_path.is_none() {
            return Ok(ResolvedOperatorWiring {
                snapshot_path: snapshot_dir(&opts.run_root).join("operators.yaml"),
                hash: existing_hash,
                source: WiringSource::RunPersisted,
                config: existing_config,
                forced_override: false,
            });
        }
        let (candidate, _) = gather_candidate(opts)?;
        let candidate_canonical = config::canonicalize(&candidate)?;
        let candidate_hash = sha256_hex(candidate_canonical.as_bytes());
        if candidate_hash == existing_hash {
            return Ok(ResolvedOperatorWiring {
                snapshot_path: snapshot_dir(&opts.run_root).join("operators.yaml"),
                hash: existing_hash,
                source: WiringSource::RunPersisted,
                config: existing_config,
                forced_override: false,
            });
        }
        if !opts.force {
            return Err(WiringError::OverrideRefused {
                existing_hash,
                new_hash: candidate_hash,
            });
        }
        let (snapshot_path, hash) =
            persist_snapshot(&opts.run_root, &candidate, WiringSource::ExplicitPath, true)?;
        return Ok(ResolvedOperatorWiring {
            snapshot_path,
            hash,
            source: WiringSource::ExplicitPath,
            config: candidate,
            forced_override: true,
        });
    }

    let (candidate, source) = gather_candidate(opts)?;
    let (snapshot_path, hash) = persist_snapshot(&opts.run_root, &candidate, source, false)?;
    Ok(ResolvedOperatorWiring {
        snapshot_path,
        hash,
        source,
        config: candidate,
        forced_override: false,
    })
}

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;
