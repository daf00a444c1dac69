//! startup-gate
//!
//! Holds back process start until the database accepts connections, and
//! runs schema migrations only once it does.
//!
//! # Architecture Overview
//!
//! ```text
//!   CLI ──▶ config ──▶ lifecycle::startup ──▶ resilience::StartupGate
//!                                                 │        │
//!                                                 ▼        ▼
//!                                           probe::Tcp  task::Command
//!                                                 │        │
//!                                                 ▼        ▼
//!                                             database  migrations
//! ```
//!
//! Every path exits 0, command-line errors included, so a supervisor never
//! crash-loops on a slow or broken database or a mistyped hook. Failures
//! surface as error-level log entries.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use serde_json::json;

use startup_gate::config::{self, GateConfig};
use startup_gate::lifecycle::{self, RetryOverrides, StartupError};
use startup_gate::observability;
use startup_gate::resilience::FaultKind;
use startup_gate::GateOutcome;

#[derive(Parser)]
#[command(name = "startup-gate")]
#[command(about = "Wait for the database at process start and run migrations safely", long_about = None)]
struct Cli {
    /// Config file (defaults to ./startup-gate.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Print the outcome as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone, Copy)]
struct RetryArgs {
    /// Override the configured maximum number of attempts
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    max_attempts: Option<u32>,

    /// Override the configured delay between attempts, in seconds
    #[arg(long)]
    delay: Option<u64>,
}

impl From<RetryArgs> for RetryOverrides {
    fn from(args: RetryArgs) -> Self {
        Self {
            max_attempts: args.max_attempts,
            delay_secs: args.delay,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run migrations once the database accepts connections
    MigrateSafe {
        /// Pass the force flag to the migration command
        #[arg(long)]
        force: bool,

        #[command(flatten)]
        retry: RetryArgs,
    },
    /// Wait until the database accepts connections
    WaitForDb {
        #[command(flatten)]
        retry: RetryArgs,
    },
}

impl Commands {
    fn stage(&self) -> &'static str {
        match self {
            Commands::MigrateSafe { .. } => "migrate",
            Commands::WaitForDb { .. } => "boot",
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            if e.use_stderr() {
                observability::init_logging(&Default::default());
                tracing::error!(kind = ?e.kind(), "Invalid command line, skipping");
            }
            return ExitCode::SUCCESS;
        }
    };
    let stage = cli.command.stage();

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let loaded = config::load_or_default(cli.config.as_deref(), &cwd);

    let observability_config = loaded
        .as_ref()
        .map(|config| config.observability.clone())
        .unwrap_or_default();
    observability::init_logging(&observability_config);

    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load configuration, skipping");
            print_skipped(stage, &e.to_string(), cli.json);
            return ExitCode::SUCCESS;
        }
    };

    match run(&cli.command, &config).await {
        Ok(outcome) => print_outcome(stage, &outcome, cli.json),
        Err(e) => {
            tracing::error!(error = %e, "Startup gate not run, skipping");
            print_skipped(stage, &e.to_string(), cli.json);
        }
    }

    ExitCode::SUCCESS
}

async fn run(command: &Commands, config: &GateConfig) -> Result<GateOutcome, StartupError> {
    match *command {
        Commands::MigrateSafe { force, retry } => {
            lifecycle::migrate_safe(config, force, retry.into()).await
        }
        Commands::WaitForDb { retry } => lifecycle::wait_for_database(config, retry.into()).await,
    }
}

fn print_outcome(stage: &str, outcome: &GateOutcome, as_json: bool) {
    if as_json {
        println!("{}", json!({ "stage": stage, "outcome": outcome }));
    } else {
        println!("{}", summary_line(stage, outcome));
    }
}

fn summary_line(stage: &str, outcome: &GateOutcome) -> String {
    match outcome {
        GateOutcome::Success { attempts } => {
            format!("{}: done after {} attempt(s).", stage, attempts)
        }
        GateOutcome::SkippedAfterExhaustion {
            attempts,
            fault_kind,
            last_error,
        } => {
            let summary = match fault_kind {
                FaultKind::Connectivity => "database unreachable",
                FaultKind::Generic => "database check failed",
            };
            format!(
                "{}: {} after {} attempt(s), skipped. Last error: {}",
                stage, summary, attempts, last_error
            )
        }
        GateOutcome::DependentOperationFailed {
            attempts,
            last_error,
        } => format!(
            "{}: migrations failed after {} attempt(s), skipped. Last error: {}",
            stage, attempts, last_error
        ),
    }
}

fn print_skipped(stage: &str, reason: &str, as_json: bool) {
    if as_json {
        println!(
            "{}",
            json!({ "stage": stage, "outcome": { "status": "not_run", "reason": reason } })
        );
    } else {
        println!("{}: not run, skipped. Reason: {}", stage, reason);
    }
}
