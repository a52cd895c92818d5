// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `wiring validate <path>`: parse and canonicalize an operators config
//! without touching any run's persisted snapshot. Catches key/backend
//! mistakes before they become a refused override on a live run.

use crate::error::CliError;
use std::path::Path;

pub fn validate(path: &Path) -> Result<String, CliError> {
    let raw = std::fs::read_to_string(path)?;
    let config = ms_wiring::config::parse_and_validate(&raw).map_err(ms_core::EngineError::from)?;
    let canonical = ms_wiring::config::canonicalize(&config).map_err(ms_core::EngineError::from)?;
    Ok(format!("{} operator(s) valid\n{canonical}", config.len()))
}
