//! Startup call sites of the gate.
//!
//! # Responsibilities
//! - Wait for the database before the application boots
//! - Run schema migrations only once the database accepts connections
//!
//! # Design Decisions
//! - Collaborators are built from config and passed to the gate explicitly
//! - Never fail fast: exhaustion is logged and reported as an outcome

use std::time::Duration;

use thiserror::Error;
use tracing::Instrument;

use crate::config::{DatabaseConfig, GateConfig, RetryConfig};
use crate::observability::gate_span;
use crate::probe::TcpProbe;
use crate::resilience::{GateOutcome, RetryPolicy, StartupGate};
use crate::task::{CommandRunner, TaskFlags};

/// Preflight failure; no attempt was made.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("no migration command configured (set migrate.command)")]
    NoMigrationCommand,

    #[error("invalid database address: {0}")]
    DatabaseAddress(String),
}

/// Per-invocation overrides of the configured retry policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct RetryOverrides {
    pub max_attempts: Option<u32>,
    pub delay_secs: Option<u64>,
}

impl RetryOverrides {
    fn apply(&self, config: &RetryConfig) -> RetryPolicy {
        let max_attempts = self.max_attempts.unwrap_or(config.max_attempts);
        let delay_secs = self.delay_secs.unwrap_or(config.delay_secs);
        RetryPolicy::new(max_attempts, Duration::from_secs(delay_secs))
    }
}

fn database_probe(config: &DatabaseConfig) -> Result<TcpProbe, StartupError> {
    let address = config.address().map_err(StartupError::DatabaseAddress)?;
    Ok(TcpProbe::new(
        address,
        Duration::from_secs(config.connect_timeout_secs),
    ))
}

/// Wait until the database accepts TCP connections (boot-time check).
pub async fn wait_for_database(
    config: &GateConfig,
    overrides: RetryOverrides,
) -> Result<GateOutcome, StartupError> {
    let probe = database_probe(&config.database)?;
    let policy = overrides.apply(&config.boot);
    let span = gate_span("boot");

    let outcome = async move {
        tracing::info!(
            address = %probe.address(),
            max_attempts = policy.max_attempts(),
            delay_secs = policy.delay().as_secs(),
            max_wait_secs = policy.worst_case_delay().as_secs(),
            "Waiting for database"
        );
        StartupGate::new(probe, policy).run().await
    }
    .instrument(span)
    .await;

    Ok(outcome)
}

/// Wait for the database, then run the migration command.
pub async fn migrate_safe(
    config: &GateConfig,
    force: bool,
    overrides: RetryOverrides,
) -> Result<GateOutcome, StartupError> {
    let runner = CommandRunner::from_argv(&config.migrate.command, config.migrate.force_flag.clone())
        .ok_or(StartupError::NoMigrationCommand)?;
    let probe = database_probe(&config.database)?;
    let policy = overrides.apply(&config.migrate.retry());
    let span = gate_span("migrate");

    let outcome = async move {
        tracing::info!(
            address = %probe.address(),
            command = ?config.migrate.command,
            force,
            max_attempts = policy.max_attempts(),
            delay_secs = policy.delay().as_secs(),
            max_wait_secs = policy.worst_case_delay().as_secs(),
            "Running migrations once the database is reachable"
        );
        StartupGate::new(probe, policy)
            .with_dependent(runner, TaskFlags { force })
            .run()
            .await
    }
    .instrument(span)
    .await;

    Ok(outcome)
}
