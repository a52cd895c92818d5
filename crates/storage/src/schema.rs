// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Schema creation and additive migration for the state store database.

use crate::error::StorageError;
use rusqlite::{params, Connection, OptionalExtension};

/// Current schema version. Bump this and add a match arm in
/// `initialize_schema` whenever a column or table is added; never remove an
/// arm for a version still reachable from an on-disk database.
pub const SCHEMA_VERSION: i64 = 5;

/// Creates the schema from scratch, or migrates an existing database
/// forward one version at a time. Refuses to open a database from a newer,
/// unknown schema version (`StorageError::SchemaVersion`, process-fatal).
pub fn initialize_schema(conn: &mut Connection) -> Result<(), StorageError> {
    let tx = conn.transaction()?;
    tx.execute_batch("CREATE TABLE IF NOT EXISTS store_meta (version INTEGER NOT NULL);")?;
    let version: Option<i64> = tx
        .query_row("SELECT version FROM store_meta LIMIT 1", params![], |row| row.get(0))
        .optional()?;

    match version {
        None => create_v5(&tx)?,
        Some(1) => {
            migrate_v1_to_v2(&tx)?;
            migrate_v2_to_v3(&tx)?;
            migrate_v3_to_v4(&tx)?;
            migrate_v4_to_v5(&tx)?;
        }
        Some(2) => {
            migrate_v2_to_v3(&tx)?;
            migrate_v3_to_v4(&tx)?;
            migrate_v4_to_v5(&tx)?;
        }
        Some(3) => {
            migrate_v3_to_v4(&tx)?;
            migrate_v4_to_v5(&tx)?;
        }
        Some(4) => migrate_v4_to_v5(&tx)?,
        Some(v) if v == SCHEMA_VERSION => {}
        Some(v) => {
            return Err(StorageError::SchemaVersion(format!(
                "database schema version {v} is newer than the {SCHEMA_VERSION} this build understands"
            )))
        }
    }
    tx.commit()?;
    Ok(())
}

fn create_v5(tx: &rusqlite::Transaction<'_>) -> Result<(), StorageError> {
    tx.execute("INSERT INTO store_meta (version) VALUES (?1)", params![SCHEMA_VERSION])?;
    tx.execute_batch(
        "CREATE TABLE runs (
            run_id TEXT PRIMARY KEY,
            workspace_slug TEXT NOT NULL,
            root_path TEXT NOT NULL,
            status TEXT NOT NULL,
            status_reason TEXT,
            created_at INTEGER NOT NULL
        );
        CREATE TABLE tasks (
            run_id TEXT NOT NULL,
            task_id TEXT NOT NULL,
            command TEXT NOT NULL,
            input_files_json TEXT NOT NULL,
            resources_json TEXT NOT NULL,
            dependencies_json TEXT NOT NULL,
            operator_key TEXT,
            env_json TEXT NOT NULL DEFAULT '{}',
            allow_failure INTEGER NOT NULL,
            logical_status TEXT NOT NULL,
            current_attempt_id TEXT,
            PRIMARY KEY (run_id, task_id),
            FOREIGN KEY (run_id) REFERENCES runs(run_id) ON DELETE CASCADE
        );
        CREATE TABLE task_attempts (
            attempt_id TEXT PRIMARY KEY,
            task_id TEXT NOT NULL,
            run_id TEXT NOT NULL,
            attempt_index INTEGER NOT NULL,
            status TEXT NOT NULL,
            external_id TEXT,
            operator_key TEXT NOT NULL,
            operator_data_json TEXT NOT NULL,
            workdir_remote TEXT,
            evidence_local_path TEXT NOT NULL,
            config_hash TEXT NOT NULL,
            config_files_json TEXT NOT NULL,
            created_at INTEGER NOT NULL,
            submitted_at INTEGER,
            ended_at INTEGER,
            reason TEXT,
            FOREIGN KEY (run_id, task_id) REFERENCES tasks(run_id, task_id) ON DELETE CASCADE
        );
        CREATE INDEX idx_task_attempts_task ON task_attempts (run_id, task_id, attempt_index);
        CREATE INDEX idx_task_attempts_active ON task_attempts (run_id, status);
        CREATE TABLE run_events (
            event_id TEXT PRIMARY KEY,
            run_id TEXT NOT NULL,
            timestamp INTEGER NOT NULL,
            action TEXT NOT NULL,
            actor TEXT NOT NULL,
            payload_json TEXT NOT NULL
        );
        CREATE INDEX idx_run_events_run ON run_events (run_id, timestamp);
        CREATE TABLE operators_snapshot (
            run_id TEXT PRIMARY KEY,
            config_hash TEXT NOT NULL,
            yaml_text TEXT NOT NULL,
            persisted_at INTEGER NOT NULL
        );
        CREATE TABLE campaign_state (
            run_id TEXT PRIMARY KEY,
            state_json TEXT NOT NULL,
            updated_at INTEGER NOT NULL
        );",
    )?;
    Ok(())
}

/// v1 was runs + tasks (no `current_attempt_id` column) + run_events, no
/// dedicated attempts table: attempts lived inline as legacy external-run
/// columns on `tasks`. v2 splits them out.
fn migrate_v1_to_v2(tx: &rusqlite::Transaction<'_>) -> Result<(), StorageError> {
    tx.execute_batch(
        "ALTER TABLE tasks ADD COLUMN current_attempt_id TEXT;
         CREATE TABLE task_attempts (
             attempt_id TEXT PRIMARY KEY,
             task_id TEXT NOT NULL,
             run_id TEXT NOT NULL,
             attempt_index INTEGER NOT NULL,
             status TEXT NOT NULL,
             external_id TEXT,
             operator_data_json TEXT NOT NULL,
             workdir_remote TEXT,
             evidence_local_path TEXT NOT NULL,
             created_at INTEGER NOT NULL,
             submitted_at INTEGER,
             ended_at INTEGER,
             reason TEXT
         );
         CREATE INDEX idx_task_attempts_task ON task_attempts (run_id, task_id, attempt_index);
         UPDATE store_meta SET version = 2;",
    )?;
    Ok(())
}

/// v2 -> v3 introduces canonical `operator_key` routing (replacing the
/// single-backend `HPC`/`LOCAL`/`HUMAN`/`EXPERIMENT` string that v1/v2 runs
/// carried implicitly) and the hash-pinned operator wiring snapshot table.
fn migrate_v2_to_v3(tx: &rusqlite::Transaction<'_>) -> Result<(), StorageError> {
    tx.execute_batch(
        "ALTER TABLE tasks ADD COLUMN operator_key TEXT;
         ALTER TABLE task_attempts ADD COLUMN operator_key TEXT NOT NULL DEFAULT '';
         CREATE TABLE operators_snapshot (
             run_id TEXT PRIMARY KEY,
             config_hash TEXT NOT NULL,
             yaml_text TEXT NOT NULL,
             persisted_at INTEGER NOT NULL
         );
         CREATE INDEX idx_task_attempts_active ON task_attempts (run_id, status);
         UPDATE store_meta SET version = 3;",
    )?;
    Ok(())
}

/// v3 -> v4 adds config provenance (`config_hash`, `config_files`) on each
/// attempt and a table for the campaign's persisted opaque JSON state.
fn migrate_v3_to_v4(tx: &rusqlite::Transaction<'_>) -> Result<(), StorageError> {
    tx.execute_batch(
        "ALTER TABLE task_attempts ADD COLUMN config_hash TEXT NOT NULL DEFAULT '';
         ALTER TABLE task_attempts ADD COLUMN config_files_json TEXT NOT NULL DEFAULT '[]';
         CREATE TABLE campaign_state (
             run_id TEXT PRIMARY KEY,
             state_json TEXT NOT NULL,
             updated_at INTEGER NOT NULL
         );
         UPDATE store_meta SET version = 4;",
    )?;
    Ok(())
}

/// v4 -> v5 adds `env_json` on tasks, carrying the per-task environment
/// assignments consulted by operator-key dispatch precedence.
fn migrate_v4_to_v5(tx: &rusqlite::Transaction<'_>) -> Result<(), StorageError> {
    tx.execute_batch(
        "ALTER TABLE tasks ADD COLUMN env_json TEXT NOT NULL DEFAULT '{}';
         UPDATE store_meta SET version = 5;",
    )?;
    Ok(())
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
