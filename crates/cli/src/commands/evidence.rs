// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{open_store, resolve_handle, Ctx};
use crate::error::CliError;
use ms_engine::{build_bundle, export_bundle};
use std::path::PathBuf;

/// `export-evidence <run_id>`: build and write the evidence bundle under
/// `<run_root>/evidence/`, or `dest` if given.
pub fn run(ctx: &Ctx, run_id: &str, dest: Option<PathBuf>) -> Result<PathBuf, CliError> {
    let handle = resolve_handle(ctx, run_id)?;
    let store = open_store(&handle)?;
    let bundle = build_bundle(&store, &handle.run_id)?;
    let dest = dest.unwrap_or_else(|| handle.run_root.join("evidence"));
    export_bundle(&bundle, &handle.run_root, &dest)?;
    Ok(dest)
}
