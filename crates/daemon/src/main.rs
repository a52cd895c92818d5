// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ms-daemond`: a long-lived process that round-robins ticks across every
//! run under a workspaces directory (spec §5 "Multi-run daemon mode"),
//! instead of a caller driving one run at a time through the CLI.

use ms_daemon::{env, run_one_cycle, RunOutcome};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn print_usage() {
    eprintln!(
        "ms-daemond {}\n\n\
         Usage: ms-daemond [--version] [--help]\n\n\
         Environment:\n\
         \x20 MATTERSTACK_WORKSPACES_ROOT    workspaces directory to service (default ~/.local/state/matterstack/workspaces)\n\
         \x20 MATTERSTACK_OPERATORS_CONFIG   operators.yaml override used when a run has none of its own\n\
         \x20 MATTERSTACK_DAEMON_LOG_DIR     rotated log file directory (default ~/.local/state/matterstack/log)\n\
         \x20 MATTERSTACK_DAEMON_POLL_MS     cycle poll interval in milliseconds (default 2000)\n\
         \x20 RUST_LOG                       tracing filter directive",
        env!("CARGO_PKG_VERSION")
    );
}

fn log_entries(entries: &[ms_daemon::CycleEntry]) {
    for entry in entries {
        match &entry.outcome {
            RunOutcome::Progressed(status) => {
                tracing::info!(run_id = %entry.run_id, status = ?status, "run progressed");
            }
            RunOutcome::Idle(_) => {}
            RunOutcome::LockHeld => {
                tracing::debug!(run_id = %entry.run_id, "run lock held by another process, skipping");
            }
            RunOutcome::Failed(message) => {
                tracing::warn!(run_id = %entry.run_id, error = %message, "run tick failed");
            }
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    if let Some(arg) = std::env::args().nth(1) {
        match arg.as_str() {
            "--version" | "-V" => {
                println!("ms-daemond {}", env!("CARGO_PKG_VERSION"));
                return ExitCode::SUCCESS;
            }
            "--help" | "-h" => {
                print_usage();
                return ExitCode::SUCCESS;
            }
            other => {
                eprintln!("ms-daemond: unrecognized argument '{other}'");
                print_usage();
                return ExitCode::from(2);
            }
        }
    }

    let log_dir = env::log_dir();
    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        eprintln!("ms-daemond: failed to create log directory {}: {e}", log_dir.display());
        return ExitCode::FAILURE;
    }
    let file_appender = tracing_appender::rolling::daily(&log_dir, "ms-daemond.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let workspaces_dir = ms_engine::env::workspaces_root();
    let poll_interval = env::poll_interval();
    tracing::info!(workspaces_dir = %workspaces_dir.display(), poll_ms = ?poll_interval, "ms-daemond starting");

    loop {
        tokio::select! {
            _ = async {
                let entries = run_one_cycle(&workspaces_dir).await;
                log_entries(&entries);
                tokio::time::sleep(poll_interval).await;
            } => {}
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("ms-daemond received shutdown signal, exiting");
                return ExitCode::SUCCESS;
            }
        }
    }
}
