// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn open_memory() -> Connection {
    Connection::open_in_memory().unwrap()
}

#[test]
fn fresh_database_lands_on_current_version() {
    let mut conn = open_memory();
    initialize_schema(&mut conn).unwrap();
    let version: i64 = conn
        .query_row("SELECT version FROM store_meta", params![], |row| row.get(0))
        .unwrap();
    assert_eq!(version, SCHEMA_VERSION);
}

#[test]
fn initializing_twice_is_a_no_op() {
    let mut conn = open_memory();
    initialize_schema(&mut conn).unwrap();
    initialize_schema(&mut conn).unwrap();
    let version: i64 = conn
        .query_row("SELECT version FROM store_meta", params![], |row| row.get(0))
        .unwrap();
    assert_eq!(version, SCHEMA_VERSION);
}

#[test]
fn migrates_forward_from_v1() {
    let mut conn = open_memory();
    conn.execute_batch(
        "CREATE TABLE store_meta (version INTEGER NOT NULL);
         INSERT INTO store_meta (version) VALUES (1);
         CREATE TABLE runs (
             run_id TEXT PRIMARY KEY, workspace_slug TEXT NOT NULL, root_path TEXT NOT NULL,
             status TEXT NOT NULL, status_reason TEXT, created_at INTEGER NOT NULL
         );
         CREATE TABLE tasks (
             run_id TEXT NOT NULL, task_id TEXT NOT NULL, command TEXT NOT NULL,
             input_files_json TEXT NOT NULL, resources_json TEXT NOT NULL,
             dependencies_json TEXT NOT NULL, allow_failure INTEGER NOT NULL,
             logical_status TEXT NOT NULL, PRIMARY KEY (run_id, task_id)
         );
         CREATE TABLE run_events (
             event_id TEXT PRIMARY KEY, run_id TEXT NOT NULL, timestamp INTEGER NOT NULL,
             action TEXT NOT NULL, actor TEXT NOT NULL, payload_json TEXT NOT NULL
         );",
    )
    .unwrap();

    initialize_schema(&mut conn).unwrap();
    let version: i64 = conn
        .query_row("SELECT version FROM store_meta", params![], |row| row.get(0))
        .unwrap();
    assert_eq!(version, SCHEMA_VERSION);

    // Columns and tables added across v2/v3/v4 now exist and are queryable.
    let row_missing_is_ok = |result: rusqlite::Result<()>| match result {
        Ok(()) | Err(rusqlite::Error::QueryReturnedNoRows) => (),
        Err(e) => panic!("expected migrated column/table to exist: {e}"),
    };
    row_missing_is_ok(conn.query_row(
        "SELECT current_attempt_id, operator_key FROM tasks LIMIT 1",
        params![],
        |_| Ok(()),
    ));
    row_missing_is_ok(conn.query_row(
        "SELECT config_hash, config_files_json FROM task_attempts LIMIT 1",
        params![],
        |_| Ok(()),
    ));
    row_missing_is_ok(conn.query_row(
        "SELECT state_json FROM campaign_state LIMIT 1",
        params![],
        |_| Ok(()),
    ));
}

#[test]
fn refuses_unknown_future_version() {
    let mut conn = open_memory();
    conn.execute_batch(
        "CREATE TABLE store_meta (version INTEGER NOT NULL);
         INSERT INTO store_meta (version) VALUES (99);",
    )
    .unwrap();
    let err = initialize_schema(&mut conn).unwrap_err();
    assert!(matches!(err, StorageError::SchemaVersion(_)));
}
