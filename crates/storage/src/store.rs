// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The transactional, versioned state store (C1): a single embedded
//! `SQLite` database per run, guarded by [`crate::lock::RunLock`].

use crate::error::StorageError;
use crate::schema::initialize_schema;
use ms_core::{
    Attempt, AttemptId, AttemptStatus, OperatorKey, ResourceIntent, Run, RunEvent, RunEventAction,
    RunEventId, RunId, RunStatus, Task, TaskId, TaskStatus,
};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// A single run's state store, backed by one `SQLite` file.
pub struct StateStore {
    conn: Mutex<Connection>,
}

impl StateStore {
    /// Open (creating if absent) the state store at `path`, initializing or
    /// migrating its schema as needed.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StorageError::Io(e.to_string()))?;
        }
        let mut conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON; PRAGMA journal_mode = WAL;")?;
        initialize_schema(&mut conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// In-memory store, for tests.
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let mut conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&mut conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    // ── Run ──────────────────────────────────────────────────────────────

    pub fn create_run(&self, run: &Run) -> Result<(), StorageError> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO runs (run_id, workspace_slug, root_path, status, status_reason, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                run.run_id.as_str(),
                run.workspace_slug,
                run.root_path.to_string_lossy(),
                status_to_str(run.status),
                run.status_reason,
                run.created_at,
            ],
        )?;
        Ok(())
    }

    pub fn get_run(&self, run_id: &RunId) -> Result<Option<Run>, StorageError> {
        let conn = self.conn.lock();
        conn.query_row(
            "SELECT run_id, workspace_slug, root_path, status, status_reason, created_at
             FROM runs WHERE run_id = ?1",
            params![run_id.as_str()],
            row_to_run,
        )
        .optional()
        .map_err(StorageError::from)
    }

    pub fn set_run_status(
        &self,
        run_id: &RunId,
        status: RunStatus,
        reason: Option<&str>,
    ) -> Result<(), StorageError> {
        let conn = self.conn.lock();
        let updated = conn.execute(
            "UPDATE runs SET status = ?2, status_reason = ?3 WHERE run_id = ?1",
            params![run_id.as_str(), status_to_str(status), reason],
        )?;
        if updated == 0 {
            return Err(StorageError::RunNotFound(run_id.to_string()));
        }
        Ok(())
    }

    pub fn get_run_status(&self, run_id: &RunId) -> Result<RunStatus, StorageError> {
        let conn = self.conn.lock();
        let raw: String = conn
            .query_row(
                "SELECT status FROM runs WHERE run_id = ?1",
                params![run_id.as_str()],
                |row| row.get(0),
            )
            .optional()?
            .ok_or_else(|| StorageError::RunNotFound(run_id.to_string()))?;
        status_from_str(&raw)
    }

    pub fn list_active_runs(&self) -> Result<Vec<RunId>, StorageError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT run_id FROM runs WHERE status IN ('PENDING', 'RUNNING', 'PAUSED')",
        )?;
        let rows = stmt.query_map(params![], |row| row.get::<_, String>(0))?;
        let mut out = Vec::new();
        for row in rows {
            out.push(RunId::new(row?));
        }
        Ok(out)
    }

    // ── Task / workflow ──────────────────────────────────────────────────

    /// Idempotent insert of a workflow's tasks, keyed by `task_id`. Tasks
    /// already present (same id, same run) are left untouched.
    pub fn add_workflow(&self, run_id: &RunId, tasks: &[Task]) -> Result<(), StorageError> {
        let conn = self.conn.lock();
        for task in tasks {
            conn.execute(
                "INSERT INTO tasks (
                    run_id, task_id, command, input_files_json, resources_json,
                    dependencies_json, operator_key, env_json, allow_failure, logical_status, current_attempt_id
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
                 ON CONFLICT(run_id, task_id) DO NOTHING",
                params![
                    run_id.as_str(),
                    task.task_id.as_str(),
                    task.command,
                    serde_json::to_string(&task.input_files).map_err(invalid)?,
                    serde_json::to_string(&task.resources).map_err(invalid)?,
                    serde_json::to_string(&task.dependencies).map_err(invalid)?,
                    task.operator_key.as_ref().map(OperatorKey::as_str),
                    serde_json::to_string(&task.env).map_err(invalid)?,
                    task.allow_failure as i64,
                    status_to_str_task(task.logical_status),
                    task.current_attempt_id.as_ref().map(AttemptId::as_str),
                ],
            )?;
        }
        Ok(())
    }

    pub fn get_tasks(&self, run_id: &RunId) -> Result<Vec<Task>, StorageError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT task_id, command, input_files_json, resources_json, dependencies_json,
                    operator_key, allow_failure, logical_status, current_attempt_id, env_json
             FROM tasks WHERE run_id = ?1 ORDER BY task_id",
        )?;
        let rows = stmt.query_map(params![run_id.as_str()], row_to_task)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row??);
        }
        Ok(out)
    }

    pub fn get_task_status(&self, run_id: &RunId, task_id: &TaskId) -> Result<TaskStatus, StorageError> {
        let conn = self.conn.lock();
        let raw: String = conn
            .query_row(
                "SELECT logical_status FROM tasks WHERE run_id = ?1 AND task_id = ?2",
                params![run_id.as_str(), task_id.as_str()],
                |row| row.get(0),
            )
            .optional()?
            .ok_or_else(|| StorageError::TaskNotFound(task_id.to_string()))?;
        task_status_from_str(&raw)
    }

    pub fn update_task_status(
        &self,
        run_id: &RunId,
        task_id: &TaskId,
        status: TaskStatus,
        current_attempt_id: Option<&AttemptId>,
    ) -> Result<(), StorageError> {
        let conn = self.conn.lock();
        let updated = conn.execute(
            "UPDATE tasks SET logical_status = ?3, current_attempt_id = ?4
             WHERE run_id = ?1 AND task_id = ?2",
            params![
                run_id.as_str(),
                task_id.as_str(),
                status_to_str_task(status),
                current_attempt_id.map(AttemptId::as_str),
            ],
        )?;
        if updated == 0 {
            return Err(StorageError::TaskNotFound(task_id.to_string()));
        }
        Ok(())
    }

    pub fn delete_task(&self, run_id: &RunId, task_id: &TaskId) -> Result<(), StorageError> {
        let conn = self.conn.lock();
        conn.execute(
            "DELETE FROM tasks WHERE run_id = ?1 AND task_id = ?2",
            params![run_id.as_str(), task_id.as_str()],
        )?;
        Ok(())
    }

    // ── Attempt ──────────────────────────────────────────────────────────

    #[allow(clippy::too_many_arguments)]
    pub fn create_attempt(
        &self,
        attempt_id: &AttemptId,
        task_id: &TaskId,
        run_id: &RunId,
        operator_key: &OperatorKey,
        operator_data: &Value,
        config_hash: &str,
        config_files: &[String],
        evidence_local_path: &Path,
        workdir_remote: Option<&str>,
        created_at: i64,
    ) -> Result<u32, StorageError> {
        let conn = self.conn.lock();
        let next_index: i64 = conn
            .query_row(
                "SELECT COALESCE(MAX(attempt_index), 0) + 1 FROM task_attempts WHERE run_id = ?1 AND task_id = ?2",
                params![run_id.as_str(), task_id.as_str()],
                |row| row.get(0),
            )?;
        conn.execute(
            "INSERT INTO task_attempts (
                attempt_id, task_id, run_id, attempt_index, status, external_id,
                operator_key, operator_data_json, workdir_remote, evidence_local_path,
                config_hash, config_files_json, created_at, submitted_at, ended_at, reason
             ) VALUES (?1, ?2, ?3, ?4, ?5, NULL, ?6, ?7, ?8, ?9, ?10, ?11, ?12, NULL, NULL, NULL)",
            params![
                attempt_id.as_str(),
                task_id.as_str(),
                run_id.as_str(),
                next_index,
                attempt_status_to_str(AttemptStatus::Created),
                operator_key.as_str(),
                serde_json::to_string(operator_data).map_err(invalid)?,
                workdir_remote,
                evidence_local_path.to_string_lossy(),
                config_hash,
                serde_json::to_string(config_files).map_err(invalid)?,
                created_at,
            ],
        )?;
        conn.execute(
            "UPDATE tasks SET current_attempt_id = ?3 WHERE run_id = ?1 AND task_id = ?2",
            params![run_id.as_str(), task_id.as_str(), attempt_id.as_str()],
        )?;
        Ok(next_index as u32)
    }

    pub fn list_attempts(&self, run_id: &RunId, task_id: &TaskId) -> Result<Vec<Attempt>, StorageError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT attempt_id, task_id, run_id, attempt_index, status, external_id,
                    operator_key, operator_data_json, workdir_remote, evidence_local_path,
                    config_hash, config_files_json, created_at, submitted_at, ended_at, reason
             FROM task_attempts WHERE run_id = ?1 AND task_id = ?2 ORDER BY attempt_index",
        )?;
        let rows = stmt.query_map(params![run_id.as_str(), task_id.as_str()], row_to_attempt)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row??);
        }
        Ok(out)
    }

    /// Attempts in any non-terminal status for the run, across all tasks.
    pub fn get_active_attempts(&self, run_id: &RunId) -> Result<Vec<Attempt>, StorageError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT attempt_id, task_id, run_id, attempt_index, status, external_id,
                    operator_key, operator_data_json, workdir_remote, evidence_local_path,
                    config_hash, config_files_json, created_at, submitted_at, ended_at, reason
             FROM task_attempts
             WHERE run_id = ?1 AND status NOT IN ('COMPLETED', 'FAILED', 'FAILED_INIT', 'CANCELLED')
             ORDER BY created_at",
        )?;
        let rows = stmt.query_map(params![run_id.as_str()], row_to_attempt)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row??);
        }
        Ok(out)
    }

    pub fn get_current_attempt(&self, run_id: &RunId, task_id: &TaskId) -> Result<Option<Attempt>, StorageError> {
        let conn = self.conn.lock();
        let current_id: Option<String> = conn
            .query_row(
                "SELECT current_attempt_id FROM tasks WHERE run_id = ?1 AND task_id = ?2",
                params![run_id.as_str(), task_id.as_str()],
                |row| row.get(0),
            )
            .optional()?
            .ok_or_else(|| StorageError::TaskNotFound(task_id.to_string()))?;
        let Some(current_id) = current_id else {
            return Ok(None);
        };
        conn.query_row(
            "SELECT attempt_id, task_id, run_id, attempt_index, status, external_id,
                    operator_key, operator_data_json, workdir_remote, evidence_local_path,
                    config_hash, config_files_json, created_at, submitted_at, ended_at, reason
             FROM task_attempts WHERE attempt_id = ?1",
            params![current_id],
            row_to_attempt,
        )?
        .map(Some)
        .map_err(StorageError::from)
    }

    /// Update an attempt's mutable fields. Rejects any change other than a
    /// reason-append once the attempt is terminal.
    pub fn update_attempt(&self, attempt_id: &AttemptId, fields: AttemptUpdate) -> Result<(), StorageError> {
        let conn = self.conn.lock();
        let current_status: String = conn
            .query_row(
                "SELECT status FROM task_attempts WHERE attempt_id = ?1",
                params![attempt_id.as_str()],
                |row| row.get(0),
            )
            .optional()?
            .ok_or_else(|| StorageError::AttemptNotFound(attempt_id.to_string()))?;
        let was_terminal = attempt_status_from_str(&current_status)?.is_terminal();

        if was_terminal {
            let only_reason_changed = fields.status.is_none()
                && fields.external_id.is_none()
                && fields.workdir_remote.is_none()
                && fields.submitted_at.is_none()
                && fields.ended_at.is_none();
            if !only_reason_changed {
                return Err(StorageError::AttemptTerminal(attempt_id.to_string()));
            }
            if let Some(reason) = &fields.reason {
                conn.execute(
                    "UPDATE task_attempts SET reason = COALESCE(reason || '; ', '') || ?2 WHERE attempt_id = ?1",
                    params![attempt_id.as_str(), reason],
                )?;
            }
            return Ok(());
        }

        if let Some(status) = fields.status {
            conn.execute(
                "UPDATE task_attempts SET status = ?2 WHERE attempt_id = ?1",
                params![attempt_id.as_str(), attempt_status_to_str(status)],
            )?;
        }
        if let Some(external_id) = &fields.external_id {
            conn.execute(
                "UPDATE task_attempts SET external_id = ?2 WHERE attempt_id = ?1",
                params![attempt_id.as_str(), external_id],
            )?;
        }
        if let Some(workdir_remote) = &fields.workdir_remote {
            conn.execute(
                "UPDATE task_attempts SET workdir_remote = ?2 WHERE attempt_id = ?1",
                params![attempt_id.as_str(), workdir_remote],
            )?;
        }
        if let Some(submitted_at) = fields.submitted_at {
            conn.execute(
                "UPDATE task_attempts SET submitted_at = ?2 WHERE attempt_id = ?1",
                params![attempt_id.as_str(), submitted_at],
            )?;
        }
        if let Some(ended_at) = fields.ended_at {
            conn.execute(
                "UPDATE task_attempts SET ended_at = ?2 WHERE attempt_id = ?1",
                params![attempt_id.as_str(), ended_at],
            )?;
        }
        if let Some(reason) = &fields.reason {
            conn.execute(
                "UPDATE task_attempts SET reason = ?2 WHERE attempt_id = ?1",
                params![attempt_id.as_str(), reason],
            )?;
        }
        Ok(())
    }

    // ── Event ────────────────────────────────────────────────────────────

    pub fn record_event(&self, event: &RunEvent) -> Result<(), StorageError> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO run_events (event_id, run_id, timestamp, action, actor, payload_json)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                event.event_id.as_str(),
                event.run_id.as_str(),
                event.timestamp,
                event.action.to_string(),
                event.actor,
                serde_json::to_string(&event.payload).map_err(invalid)?,
            ],
        )?;
        Ok(())
    }

    pub fn list_events(&self, run_id: &RunId) -> Result<Vec<RunEvent>, StorageError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT event_id, run_id, timestamp, action, actor, payload_json
             FROM run_events WHERE run_id = ?1 ORDER BY timestamp",
        )?;
        let rows = stmt.query_map(params![run_id.as_str()], row_to_event)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row??);
        }
        Ok(out)
    }

    // ── Campaign state ───────────────────────────────────────────────────

    pub fn get_campaign_state(&self, run_id: &RunId) -> Result<Option<Value>, StorageError> {
        let conn = self.conn.lock();
        let raw: Option<String> = conn
            .query_row(
                "SELECT state_json FROM campaign_state WHERE run_id = ?1",
                params![run_id.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        raw.map(|s| serde_json::from_str(&s).map_err(invalid)).transpose()
    }

    pub fn set_campaign_state(&self, run_id: &RunId, state: &Value, updated_at: i64) -> Result<(), StorageError> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO campaign_state (run_id, state_json, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(run_id) DO UPDATE SET state_json = excluded.state_json, updated_at = excluded.updated_at",
            params![run_id.as_str(), serde_json::to_string(state).map_err(invalid)?, updated_at],
        )?;
        Ok(())
    }
}

/// Patch applied by [`StateStore::update_attempt`]; `None` fields are left
/// unchanged.
#[derive(Debug, Default)]
pub struct AttemptUpdate {
    pub status: Option<AttemptStatus>,
    pub external_id: Option<String>,
    pub workdir_remote: Option<String>,
    pub submitted_at: Option<i64>,
    pub ended_at: Option<i64>,
    pub reason: Option<String>,
}

fn invalid(err: serde_json::Error) -> StorageError {
    StorageError::Invalid(err.to_string())
}

fn status_to_str(status: RunStatus) -> &'static str {
    match status {
        RunStatus::Pending => "PENDING",
        RunStatus::Running => "RUNNING",
        RunStatus::Paused => "PAUSED",
        RunStatus::Cancelled => "CANCELLED",
        RunStatus::Completed => "COMPLETED",
        RunStatus::Failed => "FAILED",
    }
}

fn status_from_str(s: &str) -> Result<RunStatus, StorageError> {
    Ok(match s {
        "PENDING" => RunStatus::Pending,
        "RUNNING" => RunStatus::Running,
        "PAUSED" => RunStatus::Paused,
        "CANCELLED" => RunStatus::Cancelled,
        "COMPLETED" => RunStatus::Completed,
        "FAILED" => RunStatus::Failed,
        other => return Err(StorageError::Corrupt(format!("unknown run status {other}"))),
    })
}

fn status_to_str_task(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Pending => "PENDING",
        TaskStatus::Ready => "READY",
        TaskStatus::Submitted => "SUBMITTED",
        TaskStatus::Running => "RUNNING",
        TaskStatus::Completed => "COMPLETED",
        TaskStatus::Failed => "FAILED",
    }
}

fn task_status_from_str(s: &str) -> Result<TaskStatus, StorageError> {
    Ok(match s {
        "PENDING" => TaskStatus::Pending,
        "READY" => TaskStatus::Ready,
        "SUBMITTED" => TaskStatus::Submitted,
        "RUNNING" => TaskStatus::Running,
        "COMPLETED" => TaskStatus::Completed,
        "FAILED" => TaskStatus::Failed,
        other => return Err(StorageError::Corrupt(format!("unknown task status {other}"))),
    })
}

fn attempt_status_to_str(status: AttemptStatus) -> &'static str {
    match status {
        AttemptStatus::Created => "CREATED",
        AttemptStatus::Submitted => "SUBMITTED",
        AttemptStatus::Running => "RUNNING",
        AttemptStatus::WaitingExternal => "WAITING_EXTERNAL",
        AttemptStatus::Completed => "COMPLETED",
        AttemptStatus::Failed => "FAILED",
        AttemptStatus::FailedInit => "FAILED_INIT",
        AttemptStatus::Cancelled => "CANCELLED",
    }
}

fn attempt_status_from_str(s: &str) -> Result<AttemptStatus, StorageError> {
    Ok(match s {
        "CREATED" => AttemptStatus::Created,
        "SUBMITTED" => AttemptStatus::Submitted,
        "RUNNING" => AttemptStatus::Running,
        "WAITING_EXTERNAL" => AttemptStatus::WaitingExternal,
        "COMPLETED" => AttemptStatus::Completed,
        "FAILED" => AttemptStatus::Failed,
        "FAILED_INIT" => AttemptStatus::FailedInit,
        "CANCELLED" => AttemptStatus::Cancelled,
        other => return Err(StorageError::Corrupt(format!("unknown attempt status {other}"))),
    })
}

fn row_to_run(row: &rusqlite::Row<'_>) -> rusqlite::Result<Run> {
    let status_raw: String = row.get(3)?;
    let root_path: String = row.get(2)?;
    Ok(Run {
        run_id: RunId::new(row.get::<_, String>(0)?),
        workspace_slug: row.get(1)?,
        root_path: PathBuf::from(root_path),
        status: status_from_str(&status_raw).unwrap_or(RunStatus::Failed),
        status_reason: row.get(4)?,
        created_at: row.get(5)?,
    })
}

fn row_to_task(row: &rusqlite::Row<'_>) -> rusqlite::Result<Result<Task, StorageError>> {
    let task_id: String = row.get(0)?;
    let command: String = row.get(1)?;
    let input_files_json: String = row.get(2)?;
    let resources_json: String = row.get(3)?;
    let dependencies_json: String = row.get(4)?;
    let operator_key: Option<String> = row.get(5)?;
    let allow_failure: i64 = row.get(6)?;
    let logical_status: String = row.get(7)?;
    let current_attempt_id: Option<String> = row.get(8)?;
    let env_json: String = row.get(9)?;

    Ok((|| -> Result<Task, StorageError> {
        let input_files: Vec<String> = serde_json::from_str(&input_files_json).map_err(invalid)?;
        let resources: ResourceIntent = serde_json::from_str(&resources_json).map_err(invalid)?;
        let dependencies: BTreeSet<TaskId> = serde_json::from_str(&dependencies_json).map_err(invalid)?;
        let env: std::collections::BTreeMap<String, String> =
            serde_json::from_str(&env_json).map_err(invalid)?;
        let operator_key = operator_key
            .map(|s| OperatorKey::parse(&s))
            .transpose()
            .map_err(|e| StorageError::Corrupt(e.to_string()))?;
        Ok(Task {
            task_id: TaskId::new(task_id),
            command,
            input_files,
            resources,
            dependencies,
            operator_key,
            env,
            allow_failure: allow_failure != 0,
            logical_status: task_status_from_str(&logical_status)?,
            current_attempt_id: current_attempt_id.map(AttemptId::new),
        })
    })())
}

fn row_to_attempt(row: &rusqlite::Row<'_>) -> rusqlite::Result<Result<Attempt, StorageError>> {
    let attempt_id: String = row.get(0)?;
    let task_id: String = row.get(1)?;
    let run_id: String = row.get(2)?;
    let attempt_index: i64 = row.get(3)?;
    let status: String = row.get(4)?;
    let external_id: Option<String> = row.get(5)?;
    let operator_key: String = row.get(6)?;
    let operator_data_json: String = row.get(7)?;
    let workdir_remote: Option<String> = row.get(8)?;
    let evidence_local_path: String = row.get(9)?;
    let config_hash: String = row.get(10)?;
    let config_files_json: String = row.get(11)?;
    let created_at: i64 = row.get(12)?;
    let submitted_at: Option<i64> = row.get(13)?;
    let ended_at: Option<i64> = row.get(14)?;
    let reason: Option<String> = row.get(15)?;

    Ok((|| -> Result<Attempt, StorageError> {
        let config_files: Vec<String> = serde_json::from_str(&config_files_json).map_err(invalid)?;
        Ok(Attempt {
            attempt_id: AttemptId::new(attempt_id),
            task_id: TaskId::new(task_id),
            run_id: RunId::new(run_id),
            attempt_index: attempt_index as u32,
            status: attempt_status_from_str(&status)?,
            external_id,
            operator_key: OperatorKey::parse(&operator_key).map_err(|e| StorageError::Corrupt(e.to_string()))?,
            operator_data: serde_json::from_str(&operator_data_json).map_err(invalid)?,
            workdir_remote,
            evidence_local_path: PathBuf::from(evidence_local_path),
            config_hash,
            config_files,
            created_at,
            submitted_at,
            ended_at,
            reason,
        })
    })())
}

fn row_to_event(row: &rusqlite::Row<'_>) -> rusqlite::Result<Result<RunEvent, StorageError>> {
    let event_id: String = row.get(0)?;
    let run_id: String = row.get(1)?;
    let timestamp: i64 = row.get(2)?;
    let action: String = row.get(3)?;
    let actor: String = row.get(4)?;
    let payload_json: String = row.get(5)?;

    Ok((|| -> Result<RunEvent, StorageError> {
        Ok(RunEvent {
            event_id: RunEventId::new(event_id),
            run_id: RunId::new(run_id),
            timestamp,
            action: action_from_str(&action)?,
            actor,
            payload: serde_json::from_str(&payload_json).map_err(invalid)?,
        })
    })())
}

fn action_from_str(s: &str) -> Result<RunEventAction, StorageError> {
    Ok(match s {
        "revive" => RunEventAction::Revive,
        "rerun" => RunEventAction::Rerun,
        "reset" => RunEventAction::Reset,
        "forced_wiring_override" => RunEventAction::ForcedWiringOverride,
        "pause" => RunEventAction::Pause,
        "resume" => RunEventAction::Resume,
        "cancel" => RunEventAction::Cancel,
        "cancel_attempt" => RunEventAction::CancelAttempt,
        other => return Err(StorageError::Corrupt(format!("unknown event action {other}"))),
    })
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
