// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ms`: the control surface for a MatterStack workflow orchestrator
//! (spec §6) — init/step/loop a run, inspect its status and frontier, and
//! issue the audited control commands.

mod commands;
mod error;
mod table;
mod workflow_file;

use clap::{Parser, Subcommand};
use commands::Ctx;
use error::CliError;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ms", version, about = "MatterStack run control surface")]
struct Cli {
    /// Workspaces directory to operate against.
    #[arg(short = 'C', long, env = "MATTERSTACK_WORKSPACES_ROOT")]
    workspaces_root: Option<PathBuf>,

    /// Increase log verbosity; repeat for more (-vv). Overridden by RUST_LOG.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a new run from a workflow file, printing its run id.
    Init {
        workspace: String,
        workflow_file: PathBuf,
        #[arg(long)]
        operators_config: Option<PathBuf>,
        #[arg(long)]
        force: bool,
    },
    /// Drive a run forward one tick.
    Step {
        run_id: String,
        #[arg(long)]
        operators_config: Option<PathBuf>,
        #[arg(long)]
        force: bool,
    },
    /// Drive a run to completion, or service every discovered run if no id is given.
    Loop { run_id: Option<String> },
    /// Print every task's status and attempt count.
    Status { run_id: String },
    /// Print what every non-terminal task is waiting on.
    Explain { run_id: String },
    /// Suspend EXECUTE for a run; POLL still observes in-flight attempts.
    Pause { run_id: String },
    /// Resume a paused run.
    Resume { run_id: String },
    /// Cancel a run with a reason; future EXECUTE is suppressed permanently.
    Cancel { run_id: String, reason: String },
    /// Reset a terminal run's status back to RUNNING.
    Revive { run_id: String },
    /// Reset a task (and optionally its transitive dependents) to PENDING.
    Rerun {
        run_id: String,
        task_id: String,
        #[arg(long)]
        recursive: bool,
    },
    /// List every attempt of one task, chronologically.
    Attempts { run_id: String, task_id: String },
    /// Best-effort cancel of one in-flight attempt.
    CancelAttempt {
        run_id: String,
        task_id: String,
        attempt_id: String,
    },
    /// Build and write a run's evidence bundle.
    ExportEvidence {
        run_id: String,
        #[arg(long)]
        dest: Option<PathBuf>,
    },
    /// Operator wiring utilities.
    Wiring {
        #[command(subcommand)]
        command: WiringCommands,
    },
}

#[derive(Subcommand)]
enum WiringCommands {
    /// Parse and canonicalize an operators config without touching any run.
    Validate { path: PathBuf },
}

fn init_tracing(verbose: u8) {
    let filter = std::env::var("RUST_LOG").ok().map(EnvFilter::new).unwrap_or_else(|| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        })
    });
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .without_time()
        .with_env_filter(filter)
        .init();
}

async fn run(cli: Cli) -> Result<String, CliError> {
    let ctx = Ctx {
        workspaces_root: cli.workspaces_root.unwrap_or_else(ms_engine::env::workspaces_root),
    };

    match cli.command {
        Commands::Init {
            workspace,
            workflow_file,
            operators_config,
            force,
        } => commands::init::run(&ctx, &workspace, &workflow_file, operators_config, force),
        Commands::Step {
            run_id,
            operators_config,
            force,
        } => commands::step::run(&ctx, &run_id, operators_config, force)
            .await
            .map(|s| s.to_string()),
        Commands::Loop { run_id } => commands::loop_cmd::run(&ctx, run_id.as_deref())
            .await
            .map(|s| s.map(|s| s.to_string()).unwrap_or_default()),
        Commands::Status { run_id } => commands::status::run(&ctx, &run_id),
        Commands::Explain { run_id } => commands::explain::run(&ctx, &run_id),
        Commands::Pause { run_id } => commands::control::pause(&ctx, &run_id).map(|()| "paused".to_string()),
        Commands::Resume { run_id } => commands::control::resume(&ctx, &run_id).map(|()| "resumed".to_string()),
        Commands::Cancel { run_id, reason } => {
            commands::control::cancel(&ctx, &run_id, &reason).map(|()| "cancelled".to_string())
        }
        Commands::Revive { run_id } => commands::control::revive(&ctx, &run_id).map(|()| "revived".to_string()),
        Commands::Rerun {
            run_id,
            task_id,
            recursive,
        } => commands::rerun::run(&ctx, &run_id, &task_id, recursive).map(|()| "rerun scheduled".to_string()),
        Commands::Attempts { run_id, task_id } => commands::attempts::run(&ctx, &run_id, &task_id),
        Commands::CancelAttempt {
            run_id,
            task_id,
            attempt_id,
        } => commands::cancel_attempt::run(&ctx, &run_id, &task_id, &attempt_id)
            .await
            .map(|()| "attempt cancel requested".to_string()),
        Commands::ExportEvidence { run_id, dest } => commands::evidence::run(&ctx, &run_id, dest)
            .map(|path| format!("evidence bundle written to {}", path.display())),
        Commands::Wiring { command } => match command {
            WiringCommands::Validate { path } => commands::wiring::validate(&path),
        },
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(output) => {
            if !output.is_empty() {
                println!("{output}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("ms: {e}");
            ExitCode::from(e.exit_code() as u8)
        }
    }
}
