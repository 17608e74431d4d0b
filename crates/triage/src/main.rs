// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Triage - help-channel thread lifecycle tracking.
//!
//! This is the binary entry point. Events arrive as JSON lines on stdin and
//! the resulting action directives leave as JSON lines on stdout; logs go to
//! stderr.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod admin;
mod app;
mod doctor;
mod process;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use triage_config::model::TriageConfig;
use triage_core::{PatternKind, TriageError};

/// Triage - help-channel thread lifecycle tracking.
#[derive(Parser, Debug)]
#[command(name = "triage", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the default locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Handle events read as JSON lines from stdin.
    Process {
        /// Input lines are platform payloads rather than canonical events.
        #[arg(long)]
        raw: bool,
    },
    /// Run one reminder sweep.
    Remind,
    /// Post the weekly report for a period.
    Report {
        /// First day of the period (YYYY-MM-DD).
        #[arg(long)]
        start: String,
        /// End of the period (YYYY-MM-DD, midnight UTC).
        #[arg(long)]
        end: String,
    },
    /// Process stdin events and run the reminder sweep until interrupted.
    Serve {
        /// Input lines are platform payloads rather than canonical events.
        #[arg(long)]
        raw: bool,
    },
    /// Manage the team roster.
    Team {
        #[command(subcommand)]
        action: TeamAction,
    },
    /// Manage canned answers.
    Answer {
        #[command(subcommand)]
        action: AnswerAction,
    },
    /// Manage tool and label detection patterns.
    Pattern {
        #[command(subcommand)]
        action: PatternAction,
    },
    /// Check configuration, database and classifier.
    Doctor {
        /// Disable colored output.
        #[arg(long)]
        plain: bool,
    },
}

#[derive(Subcommand, Debug)]
pub(crate) enum TeamAction {
    /// Add (or rename) a team member.
    Add {
        user_id: String,
        #[arg(long, default_value = "")]
        name: String,
    },
    Remove {
        user_id: String,
    },
    List,
}

#[derive(Subcommand, Debug)]
pub(crate) enum AnswerAction {
    /// Store a canned answer. An empty tool or label matches messages without one.
    Add {
        #[arg(long, default_value = "")]
        tool: String,
        #[arg(long, default_value = "")]
        label: String,
        /// Ask the author whether the answer helped.
        #[arg(long)]
        feedback: bool,
        text: String,
    },
    Remove {
        id: i64,
    },
    List,
}

#[derive(Subcommand, Debug)]
pub(crate) enum PatternAction {
    /// Add or replace a case-insensitive detection regex.
    Add {
        kind: PatternKind,
        name: String,
        regex: String,
    },
    Remove {
        kind: PatternKind,
        name: String,
    },
    List {
        kind: PatternKind,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => triage_config::load_and_validate_path(path),
        None => triage_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            triage_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.service.log_level);

    if let Err(e) = run(cli.command, config).await {
        eprintln!("triage: {e}");
        std::process::exit(1);
    }
}

async fn run(command: Commands, config: TriageConfig) -> Result<(), TriageError> {
    match command {
        Commands::Process { raw } => process::run_process(&config, raw).await,
        Commands::Remind => process::run_remind(&config).await,
        Commands::Report { start, end } => process::run_report(&config, start, end).await,
        Commands::Serve { raw } => serve::run_serve(&config, raw).await,
        Commands::Team { action } => admin::run_team(&config, action).await,
        Commands::Answer { action } => admin::run_answer(&config, action).await,
        Commands::Pattern { action } => admin::run_pattern(&config, action).await,
        Commands::Doctor { plain } => doctor::run_doctor(&config, plain).await,
    }
}

/// Logs to stderr so stdout stays a clean directive stream.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("triage={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
