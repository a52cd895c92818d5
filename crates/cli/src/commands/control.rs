// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{open_store, resolve_handle, Ctx};
use crate::error::CliError;
use ms_core::SystemClock;

const ACTOR: &str = "cli";

pub fn pause(ctx: &Ctx, run_id: &str) -> Result<(), CliError> {
    let handle = resolve_handle(ctx, run_id)?;
    let store = open_store(&handle)?;
    Ok(ms_engine::pause(&store, &handle.run_id, ACTOR, &SystemClock)?)
}

pub fn resume(ctx: &Ctx, run_id: &str) -> Result<(), CliError> {
    let handle = resolve_handle(ctx, run_id)?;
    let store = open_store(&handle)?;
    Ok(ms_engine::resume(&store, &handle.run_id, ACTOR, &SystemClock)?)
}

pub fn cancel(ctx: &Ctx, run_id: &str, reason: &str) -> Result<(), CliError> {
    let handle = resolve_handle(ctx, run_id)?;
    let store = open_store(&handle)?;
    Ok(ms_engine::cancel(&store, &handle.run_id, reason, ACTOR, &SystemClock)?)
}

pub fn revive(ctx: &Ctx, run_id: &str) -> Result<(), CliError> {
    let handle = resolve_handle(ctx, run_id)?;
    let store = open_store(&handle)?;
    Ok(ms_engine::revive(&store, &handle.run_id, ACTOR, &SystemClock)?)
}
