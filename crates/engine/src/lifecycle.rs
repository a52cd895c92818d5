// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Run Lifecycle Engine (C6): `initialize_run`, the stateless
//! `step_run` tick, `run_until_completion`, and the audited control
//! commands (pause/resume/cancel/revive/rerun/cancel_attempt).

use crate::config::RunConfig;
use ms_core::{
    Attempt, AttemptId, AttemptStatus, Campaign, ChronologicalIdGen, Clock, EngineError,
    ExternalStatus, IdGen, OperatorKey, Run, RunEvent, RunEventAction, RunEventId, RunId,
    RunStatus, SystemClock, Task, TaskId, TaskStatus,
};
use ms_operators::operator::evidence_relative_path;
use ms_operators::{Operator, OperatorContext, OperatorRegistry};
use ms_storage::{AttemptUpdate, RunLock, StateStore};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// A handle to a run, cheap to clone and hold across ticks. Carries no open
/// database connection or lock — those are acquired fresh each `step_run`.
#[derive(Clone)]
pub struct RunHandle {
    pub run_id: RunId,
    pub workspace_slug: String,
    pub run_root: PathBuf,
    pub db_path: PathBuf,
    pub clock: Arc<dyn Clock>,
    pub id_gen: Arc<dyn IdGen>,
}

/// Where operator wiring should be resolved from, forwarded verbatim to
/// `ms_wiring::resolve`.
#[derive(Debug, Clone, Default)]
pub struct WiringSource {
    pub explicit_path: Option<PathBuf>,
    pub env_path: Option<PathBuf>,
    pub force: bool,
}

/// Outcome of a single `step_run` tick.
#[derive(Debug, Clone)]
pub struct StepOutcome {
    pub run_status: RunStatus,
    /// Whether any task or attempt changed status this tick. Drives
    /// `run_until_completion`'s idle/backoff pacing.
    pub progressed: bool,
}

fn now_ms(clock: &dyn Clock) -> i64 {
    clock.epoch_ms() as i64
}

fn operators_yaml_path(run_root: &Path) -> PathBuf {
    run_root.join("operators_snapshot").join("operators.yaml")
}

fn resolve_registry(
    run_root: &Path,
    source: &WiringSource,
) -> Result<(OperatorRegistry, ms_wiring::ResolvedOperatorWiring), EngineError> {
    let workspace_root = run_root
        .parent() // runs/
        .and_then(Path::parent) // <slug>/
        .map(Path::to_path_buf)
        .unwrap_or_else(|| run_root.to_path_buf());
    let resolved = ms_wiring::resolve(&ms_wiring::ResolveOptions {
        run_root: run_root.to_path_buf(),
        workspace_root,
        explicit_path: source.explicit_path.clone(),
        env_path: source.env_path.clone(),
        force: source.force,
    })?;
    let registry = OperatorRegistry::build(&resolved.config)?;
    Ok((registry, resolved))
}

/// Initialize a new run: resolve its root, stand up the state store,
/// pin operator wiring, seed the first workflow from the campaign, and
/// mark it RUNNING.
#[allow(clippy::too_many_arguments)]
pub fn initialize_run(
    root_path: &Path,
    workspace_slug: &str,
    campaign: &dyn Campaign,
    config: RunConfig,
    wiring_source: WiringSource,
    clock: Arc<dyn Clock>,
    id_gen: Arc<dyn IdGen>,
) -> Result<RunHandle, EngineError> {
    let run_id = RunId::new(id_gen.next(clock.as_ref()));
    let run = Run::new(run_id.clone(), workspace_slug, root_path.to_path_buf(), now_ms(clock.as_ref()));
    let run_root = run.run_root();
    std::fs::create_dir_all(&run_root).map_err(|e| EngineError::TransientBackend(e.to_string()))?;

    let db_path = run_root.join("state.db");
    let store = StateStore::open(&db_path)?;
    store.create_run(&run)?;

    let (_, resolved) = resolve_registry(&run_root, &wiring_source)?;
    if resolved.forced_override {
        record_event(&store, &run_id, RunEventAction::ForcedWiringOverride, "system", now_ms(clock.as_ref()))?;
    }

    config
        .save(&run_root.join("config.json"))
        .map_err(|e| EngineError::TransientBackend(e.to_string()))?;

    let initial_state = Value::Null;
    if let Some(tasks) = campaign.plan(&initial_state) {
        store.add_workflow(&run_id, &tasks)?;
    }
    store.set_campaign_state(&run_id, &initial_state, now_ms(clock.as_ref()))?;
    refresh_readiness(&store, &run_id)?;
    store.set_run_status(&run_id, RunStatus::Running, None)?;

    Ok(RunHandle {
        run_id,
        workspace_slug: workspace_slug.to_string(),
        run_root,
        db_path,
        clock,
        id_gen,
    })
}

/// A task is READY once every dependency is COMPLETED (or FAILED with
/// `allow_failure`) and it has no active attempt. Recomputed idempotently
/// every PLAN phase; never regresses a task that is already non-PENDING.
fn refresh_readiness(store: &StateStore, run_id: &RunId) -> Result<(), EngineError> {
    let tasks = store.get_tasks(run_id)?;
    let satisfied: BTreeSet<TaskId> = tasks
        .iter()
        .filter(|t| t.logical_status == TaskStatus::Completed || (t.logical_status == TaskStatus::Failed && t.allow_failure))
        .map(|t| t.task_id.clone())
        .collect();
    for task in tasks.iter().filter(|t| t.logical_status == TaskStatus::Pending) {
        if task.current_attempt_id.is_none() && task.dependencies_satisfied(&satisfied) {
            store.update_task_status(run_id, &task.task_id, TaskStatus::Ready, None)?;
        }
    }
    Ok(())
}

/// The terminal task status an attempt's outcome settles onto.
fn task_status_for(attempt_status: AttemptStatus) -> TaskStatus {
    match attempt_status {
        AttemptStatus::Completed => TaskStatus::Completed,
        AttemptStatus::Submitted | AttemptStatus::Running | AttemptStatus::WaitingExternal => TaskStatus::Running,
        _ => TaskStatus::Failed,
    }
}

fn settle_attempt(
    store: &StateStore,
    attempt: &Attempt,
    status: AttemptStatus,
    reason: Option<&str>,
    now: i64,
) -> Result<(), EngineError> {
    store.update_attempt(
        &attempt.attempt_id,
        AttemptUpdate {
            status: Some(status),
            ended_at: Some(now),
            reason: reason.map(str::to_string),
            ..Default::default()
        },
    )?;
    store.update_task_status(&attempt.run_id, &attempt.task_id, task_status_for(status), Some(&attempt.attempt_id))?;
    if let Some(reason) = reason {
        tracing::warn!(attempt_id = %attempt.attempt_id, task_id = %attempt.task_id, %status, %reason, "attempt settled");
    } else {
        tracing::info!(attempt_id = %attempt.attempt_id, task_id = %attempt.task_id, %status, "attempt settled");
    }
    Ok(())
}

async fn poll_phase(
    store: &StateStore,
    registry: &OperatorRegistry,
    ctx: &OperatorContext,
    clock: &dyn Clock,
) -> Result<bool, EngineError> {
    let mut progressed = false;
    for mut attempt in store.get_active_attempts(&ctx.run_id)? {
        let Some(operator) = registry.get(&attempt.operator_key) else {
            settle_attempt(
                store,
                &attempt,
                AttemptStatus::Failed,
                Some(&format!("unknown operator key: {}", attempt.operator_key)),
                now_ms(clock),
            )?;
            progressed = true;
            continue;
        };

        let check_result = operator.check(ctx, &attempt).await;
        match check_result {
            Ok(ExternalStatus::Pending) => {}
            Ok(ExternalStatus::Unreachable) => {
                tracing::warn!(attempt_id = %attempt.attempt_id, "backend unreachable; retrying next tick");
            }
            Ok(ExternalStatus::Succeeded) => match operator.collect(ctx, &mut attempt).await {
                Ok(()) => {
                    settle_attempt(store, &attempt, AttemptStatus::Completed, None, now_ms(clock))?;
                    progressed = true;
                }
                Err(e) => {
                    settle_attempt(
                        store,
                        &attempt,
                        AttemptStatus::Failed,
                        Some(&format!("collect failed: {e}")),
                        now_ms(clock),
                    )?;
                    progressed = true;
                }
            },
            Ok(ExternalStatus::Failed) => {
                settle_attempt(
                    store,
                    &attempt,
                    AttemptStatus::Failed,
                    Some("backend reported terminal failure"),
                    now_ms(clock),
                )?;
                progressed = true;
            }
            Ok(ExternalStatus::Killed) => {
                settle_attempt(
                    store,
                    &attempt,
                    AttemptStatus::Cancelled,
                    Some("backend reported the attempt was killed"),
                    now_ms(clock),
                )?;
                progressed = true;
            }
            Ok(ExternalStatus::Unknown) => {
                settle_attempt(
                    store,
                    &attempt,
                    AttemptStatus::Failed,
                    Some("backend has no record of this attempt's external id"),
                    now_ms(clock),
                )?;
                progressed = true;
            }
            Err(op_err) => {
                let engine_err: EngineError = op_err.into();
                if let EngineError::TransientBackend(ref msg) = engine_err {
                    tracing::warn!(attempt_id = %attempt.attempt_id, %msg, "transient backend error; retrying next tick");
                } else {
                    settle_attempt(store, &attempt, AttemptStatus::Failed, Some(&engine_err.to_string()), now_ms(clock))?;
                    progressed = true;
                }
            }
        }
    }
    Ok(progressed)
}

fn config_snapshot_hash(task: &Task) -> String {
    let mut hasher = Sha256::new();
    for file in &task.input_files {
        hasher.update(file.as_bytes());
        hasher.update(b"\0");
    }
    format!("{:x}", hasher.finalize())
}

async fn execute_phase(
    store: &StateStore,
    registry: &OperatorRegistry,
    ctx: &OperatorContext,
    handle: &RunHandle,
    config: &RunConfig,
    default_key: &OperatorKey,
) -> Result<bool, EngineError> {
    let mut progressed = false;
    let active = store.get_active_attempts(&handle.run_id)?;
    let mut global_active = active.len() as u32;
    let mut per_operator_active: HashMap<String, u32> = HashMap::new();
    for a in &active {
        *per_operator_active.entry(a.operator_key.as_str().to_string()).or_insert(0) += 1;
    }

    let ready_tasks: Vec<Task> = store
        .get_tasks(&handle.run_id)?
        .into_iter()
        .filter(|t| t.logical_status == TaskStatus::Ready)
        .collect();

    for task in ready_tasks {
        if global_active >= config.max_concurrent_global {
            break;
        }
        let key = match task.resolve_operator_key(default_key) {
            Ok(k) => k,
            Err(e) => {
                store.update_task_status(&handle.run_id, &task.task_id, TaskStatus::Failed, None)?;
                tracing::warn!(task_id = %task.task_id, error = %e, "task has no resolvable operator key");
                progressed = true;
                continue;
            }
        };
        let cap = config.cap_for(key.as_str());
        let used = per_operator_active.get(key.as_str()).copied().unwrap_or(0);
        if used >= cap {
            continue;
        }

        let attempt_id = AttemptId::new(handle.id_gen.next(handle.clock.as_ref()));
        let now = now_ms(handle.clock.as_ref());
        let evidence_local_path = evidence_relative_path(task.task_id.as_str(), attempt_id.as_str());
        let config_hash = config_snapshot_hash(&task);

        let attempt_index = store.create_attempt(
            &attempt_id,
            &task.task_id,
            &handle.run_id,
            &key,
            &Value::Null,
            &config_hash,
            &task.input_files,
            &evidence_local_path,
            None,
            now,
        )?;
        store.update_task_status(&handle.run_id, &task.task_id, TaskStatus::Submitted, Some(&attempt_id))?;

        let Some(operator) = registry.get(&key) else {
            let attempt = attempt_snapshot(&task, &attempt_id, &handle.run_id, attempt_index, &key, &config_hash, &evidence_local_path, now);
            settle_attempt(
                store,
                &attempt,
                AttemptStatus::FailedInit,
                Some(&format!("unknown operator key: {key}")),
                now,
            )?;
            progressed = true;
            continue;
        };

        let mut attempt = attempt_snapshot(&task, &attempt_id, &handle.run_id, attempt_index, &key, &config_hash, &evidence_local_path, now);
        let dispatch_result = async {
            operator.prepare(ctx, &task, &mut attempt).await?;
            operator.submit(ctx, &mut attempt).await
        }
        .await;

        match dispatch_result {
            Ok(()) => {
                store.update_attempt(
                    &attempt_id,
                    AttemptUpdate {
                        status: Some(AttemptStatus::Submitted),
                        external_id: attempt.external_id.clone(),
                        workdir_remote: attempt.workdir_remote.clone(),
                        submitted_at: Some(now),
                        ..Default::default()
                    },
                )?;
                *per_operator_active.entry(key.as_str().to_string()).or_insert(0) += 1;
                global_active += 1;
                progressed = true;
            }
            Err(op_err) => {
                settle_attempt(store, &attempt, AttemptStatus::FailedInit, Some(&op_err.to_string()), now)?;
                progressed = true;
            }
        }
    }
    Ok(progressed)
}

#[allow(clippy::too_many_arguments)]
fn attempt_snapshot(
    task: &Task,
    attempt_id: &AttemptId,
    run_id: &RunId,
    attempt_index: u32,
    operator_key: &OperatorKey,
    config_hash: &str,
    evidence_local_path: &Path,
    created_at: i64,
) -> Attempt {
    Attempt {
        attempt_id: attempt_id.clone(),
        task_id: task.task_id.clone(),
        run_id: run_id.clone(),
        attempt_index,
        status: AttemptStatus::Created,
        external_id: None,
        operator_key: operator_key.clone(),
        operator_data: Value::Null,
        workdir_remote: None,
        evidence_local_path: evidence_local_path.to_path_buf(),
        config_hash: config_hash.to_string(),
        config_files: task.input_files.clone(),
        created_at,
        submitted_at: None,
        ended_at: None,
        reason: None,
    }
}

fn analyze_phase(
    store: &StateStore,
    run_id: &RunId,
    campaign: &dyn Campaign,
    now: i64,
) -> Result<Option<RunStatus>, EngineError> {
    let tasks = store.get_tasks(run_id)?;
    if tasks.is_empty() || !tasks.iter().all(|t| t.logical_status.is_terminal()) {
        return Ok(None);
    }
    if tasks
        .iter()
        .any(|t| t.logical_status == TaskStatus::Failed && !t.allow_failure)
    {
        store.set_run_status(run_id, RunStatus::Failed, Some("a required task failed"))?;
        return Ok(Some(RunStatus::Failed));
    }

    let mut results = ms_core::AnalyzeResults::new();
    for task in &tasks {
        let attempts = store.list_attempts(run_id, &task.task_id)?;
        let current = task
            .current_attempt_id
            .as_ref()
            .and_then(|id| attempts.iter().find(|a| &a.attempt_id == id));
        results.insert(
            task.task_id.to_string(),
            ms_core::TaskResult {
                status: task.logical_status,
                attempt_id: current.map(|a| a.attempt_id.to_string()),
                evidence_path: current.map(|a| a.evidence_local_path.display().to_string()),
                artifact_paths: Vec::new(),
            },
        );
    }

    let state = store.get_campaign_state(run_id)?.unwrap_or(Value::Null);
    let new_state = campaign.analyze(&state, &results);
    store.set_campaign_state(run_id, &new_state, now)?;

    match campaign.plan(&new_state) {
        Some(next_tasks) => {
            store.add_workflow(run_id, &next_tasks)?;
            refresh_readiness(store, run_id)?;
            Ok(Some(RunStatus::Running))
        }
        None => {
            store.set_run_status(run_id, RunStatus::Completed, None)?;
            Ok(Some(RunStatus::Completed))
        }
    }
}

/// Run one stateless tick: acquire the lock, run POLL/PLAN/EXECUTE/ANALYZE,
/// release. Never blocks on task completion.
pub async fn step_run(
    handle: &RunHandle,
    campaign: &dyn Campaign,
    config: &RunConfig,
    wiring_source: &WiringSource,
) -> Result<StepOutcome, EngineError> {
    let _lock = RunLock::try_acquire(RunLock::path_for_db(&handle.db_path))?;
    let store = StateStore::open(&handle.db_path)?;

    let run_status = store.get_run_status(&handle.run_id)?;
    if run_status.is_terminal() {
        return Ok(StepOutcome {
            run_status,
            progressed: false,
        });
    }

    let (registry, _resolved) = resolve_registry(&handle.run_root, wiring_source)?;
    let default_key = OperatorKey::parse(&config.default_operator_key)
        .map_err(|e| EngineError::ManifestValidation(e.to_string()))?;
    let ctx = OperatorContext {
        run_id: handle.run_id.clone(),
        workspace_slug: handle.workspace_slug.clone(),
        run_root: handle.run_root.clone(),
    };

    let mut progressed = poll_phase(&store, &registry, &ctx, handle.clock.as_ref()).await?;

    refresh_readiness(&store, &handle.run_id)?;

    if !matches!(run_status, RunStatus::Paused | RunStatus::Cancelled) {
        progressed |= execute_phase(&store, &registry, &ctx, handle, config, &default_key).await?;
    }

    let new_status = analyze_phase(&store, &handle.run_id, campaign, now_ms(handle.clock.as_ref()))?.unwrap_or(run_status);

    Ok(StepOutcome {
        run_status: new_status,
        progressed,
    })
}

/// Repeatedly `step_run` until the run reaches a terminal status. Sleeps
/// `tick_interval` between ticks that made no progress rather than
/// busy-spinning; returns immediately once CANCELLED.
pub async fn run_until_completion(
    handle: &RunHandle,
    campaign: &dyn Campaign,
    config: &RunConfig,
    wiring_source: &WiringSource,
    tick_interval: Duration,
) -> Result<RunStatus, EngineError> {
    loop {
        let outcome = step_run(handle, campaign, config, wiring_source).await?;
        if outcome.run_status.is_terminal() {
            return Ok(outcome.run_status);
        }
        if !outcome.progressed {
            tokio::time::sleep(tick_interval).await;
        }
    }
}

fn record_event(store: &StateStore, run_id: &RunId, action: RunEventAction, actor: &str, now: i64) -> Result<(), EngineError> {
    let event = RunEvent {
        event_id: RunEventId::new(ChronologicalIdGen.next(&SystemClock)),
        run_id: run_id.clone(),
        timestamp: now,
        action,
        actor: actor.to_string(),
        payload: Value::Null,
    };
    tracing::info!(run_id = %event.run_id, action = %event.action, actor = %event.actor, "run event");
    store.record_event(&event)?;
    Ok(())
}

/// Pause a run: POLL continues next tick, EXECUTE is suppressed.
pub fn pause(store: &StateStore, run_id: &RunId, actor: &str, clock: &dyn Clock) -> Result<(), EngineError> {
    store.set_run_status(run_id, RunStatus::Paused, None)?;
    record_event(store, run_id, RunEventAction::Pause, actor, now_ms(clock))
}

pub fn resume(store: &StateStore, run_id: &RunId, actor: &str, clock: &dyn Clock) -> Result<(), EngineError> {
    store.set_run_status(run_id, RunStatus::Running, None)?;
    record_event(store, run_id, RunEventAction::Resume, actor, now_ms(clock))
}

/// Cancel a run: future EXECUTE is suppressed permanently; POLL still
/// observes in-flight attempts to terminal (spec §5 cancellation semantics
/// means `step_run` returning early on a terminal run happens *after* this
/// call persists, not during it).
pub fn cancel(store: &StateStore, run_id: &RunId, reason: &str, actor: &str, clock: &dyn Clock) -> Result<(), EngineError> {
    store.set_run_status(run_id, RunStatus::Cancelled, Some(reason))?;
    record_event(store, run_id, RunEventAction::Cancel, actor, now_ms(clock))
}

/// Reset a terminal run's status back to RUNNING.
pub fn revive(store: &StateStore, run_id: &RunId, actor: &str, clock: &dyn Clock) -> Result<(), EngineError> {
    store.set_run_status(run_id, RunStatus::Running, None)?;
    record_event(store, run_id, RunEventAction::Revive, actor, now_ms(clock))
}

/// Reset `task_id` (and, if `recursive`, every task transitively depending
/// on it) to PENDING so the next PLAN/EXECUTE creates fresh attempts.
pub fn rerun(store: &StateStore, run_id: &RunId, task_id: &TaskId, recursive: bool, actor: &str, clock: &dyn Clock) -> Result<(), EngineError> {
    let tasks = store.get_tasks(run_id)?;
    let mut targets = BTreeSet::new();
    targets.insert(task_id.clone());
    if recursive {
        loop {
            let mut grew = false;
            for task in &tasks {
                if targets.contains(&task.task_id) {
                    continue;
                }
                if task.dependencies.iter().any(|d| targets.contains(d)) {
                    targets.insert(task.task_id.clone());
                    grew = true;
                }
            }
            if !grew {
                break;
            }
        }
    }
    for id in &targets {
        store.update_task_status(run_id, id, TaskStatus::Pending, None)?;
    }
    record_event(store, run_id, RunEventAction::Rerun, actor, now_ms(clock))
}

/// Best-effort cancel of one in-flight attempt. The owning task becomes
/// eligible for rerun only via an explicit `rerun` call, never automatically.
pub async fn cancel_attempt(
    store: &StateStore,
    run_id: &RunId,
    task_id: &TaskId,
    attempt_id: &AttemptId,
    operator: &dyn Operator,
    ctx: &OperatorContext,
    actor: &str,
    clock: &dyn Clock,
) -> Result<(), EngineError> {
    let attempts = store.list_attempts(run_id, task_id)?;
    let Some(attempt) = attempts.into_iter().find(|a| &a.attempt_id == attempt_id) else {
        return Err(EngineError::ManifestValidation(format!("attempt {attempt_id} not found")));
    };
    if !attempt.status.is_terminal() {
        operator.cancel(ctx, &attempt).await?;
    }
    settle_attempt(store, &attempt, AttemptStatus::Cancelled, Some("cancelled by operator request"), now_ms(clock))?;
    record_event(store, run_id, RunEventAction::CancelAttempt, actor, now_ms(clock))
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
