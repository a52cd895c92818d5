// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors raised by the daemon's own bookkeeping, distinct from
//! [`ms_core::EngineError`] which is what a single run's tick can fail with.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("no workspaces root configured or discoverable")]
    NoWorkspacesRoot,

    #[error("io error reading run config at {path}: {source}")]
    ReadConfig {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
