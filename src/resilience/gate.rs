//! Startup gate: bounded retries before a dependent operation.
//!
//! # States
//! ```text
//! Pending → Attempting(1)
//! Attempting(n) → Success          probe ok, dependent task ok (or none)
//! Attempting(n) → Attempting(n+1)  any fault, attempts remain
//! Attempting(n) → Exhausted        any fault on the last attempt
//! ```
//!
//! # Design Decisions
//! - Never propagates a fault; every path ends in a `GateOutcome`
//! - A failing dependent task consumes an attempt from the same counter
//!   as a failing probe and restarts the whole sequence
//! - Exhaustion is a soft outcome; callers decide how to report it

use serde::Serialize;

use crate::probe::ConnectivityProbe;
use crate::resilience::delay::{Sleeper, TokioSleeper};
use crate::resilience::fault::{Fault, FaultKind};
use crate::resilience::retries::RetryPolicy;
use crate::task::{NoTask, TaskFlags, TaskRunner};

/// Result of a gate run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GateOutcome {
    /// The dependency was reachable and the dependent task (if any) succeeded.
    Success { attempts: u32 },
    /// Every attempt failed; the last failure came from the probe.
    SkippedAfterExhaustion {
        attempts: u32,
        fault_kind: FaultKind,
        last_error: String,
    },
    /// Every attempt failed; the last failure came from the dependent task.
    DependentOperationFailed { attempts: u32, last_error: String },
}

impl GateOutcome {
    pub fn attempts(&self) -> u32 {
        match self {
            GateOutcome::Success { attempts }
            | GateOutcome::SkippedAfterExhaustion { attempts, .. }
            | GateOutcome::DependentOperationFailed { attempts, .. } => *attempts,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, GateOutcome::Success { .. })
    }
}

/// Which step of an attempt failed.
enum Failure {
    Probe(Fault),
    Dependent(Fault),
}

impl Failure {
    fn fault(&self) -> &Fault {
        match self {
            Failure::Probe(fault) | Failure::Dependent(fault) => fault,
        }
    }

    fn step(&self) -> &'static str {
        match self {
            Failure::Probe(_) => "probe",
            Failure::Dependent(_) => "dependent",
        }
    }
}

/// Retries a connectivity probe, then runs an optional dependent task.
pub struct StartupGate<P, T = NoTask, S = TokioSleeper> {
    probe: P,
    dependent: Option<T>,
    flags: TaskFlags,
    policy: RetryPolicy,
    sleeper: S,
}

impl<P: ConnectivityProbe> StartupGate<P> {
    /// Create a gate that only waits for the dependency.
    pub fn new(probe: P, policy: RetryPolicy) -> Self {
        Self {
            probe,
            dependent: None,
            flags: TaskFlags::default(),
            policy,
            sleeper: TokioSleeper,
        }
    }
}

impl<P, T, S> StartupGate<P, T, S>
where
    P: ConnectivityProbe,
    T: TaskRunner,
    S: Sleeper,
{
    /// Run `task` with `flags` after every successful probe.
    pub fn with_dependent<U: TaskRunner>(self, task: U, flags: TaskFlags) -> StartupGate<P, U, S> {
        StartupGate {
            probe: self.probe,
            dependent: Some(task),
            flags,
            policy: self.policy,
            sleeper: self.sleeper,
        }
    }

    /// Replace the sleeper used between attempts.
    pub fn with_sleeper<Z: Sleeper>(self, sleeper: Z) -> StartupGate<P, T, Z> {
        StartupGate {
            probe: self.probe,
            dependent: self.dependent,
            flags: self.flags,
            policy: self.policy,
            sleeper,
        }
    }

    /// Run the gate to completion.
    pub async fn run(&self) -> GateOutcome {
        let max_attempts = self.policy.max_attempts();
        let mut attempt = 0;

        loop {
            attempt += 1;
            tracing::debug!(attempt, max_attempts, "Checking dependency");

            let failure = match self.attempt().await {
                Ok(()) => {
                    tracing::info!(attempt, max_attempts, "Dependency ready");
                    return GateOutcome::Success { attempts: attempt };
                }
                Err(failure) => failure,
            };

            if !self.policy.has_remaining(attempt) {
                return self.exhausted(attempt, failure);
            }

            let fault = failure.fault();
            tracing::warn!(
                attempt,
                max_attempts,
                step = failure.step(),
                fault_kind = %fault.kind(),
                error = %fault.message(),
                delay_secs = self.policy.delay().as_secs(),
                "Attempt failed, retrying"
            );
            self.sleeper.sleep(self.policy.delay()).await;
        }
    }

    async fn attempt(&self) -> Result<(), Failure> {
        self.probe.try_connect().await.map_err(Failure::Probe)?;

        let Some(task) = &self.dependent else {
            return Ok(());
        };

        match task.run(self.flags).await {
            Ok(exit) if exit.success() => Ok(()),
            Ok(exit) => Err(Failure::Dependent(Fault::generic(format!(
                "'{}' finished with {}",
                task.name(),
                exit
            )))),
            Err(fault) => Err(Failure::Dependent(fault)),
        }
    }

    fn exhausted(&self, attempts: u32, failure: Failure) -> GateOutcome {
        let fault = failure.fault();
        match fault.kind() {
            FaultKind::Connectivity => tracing::error!(
                attempts,
                step = failure.step(),
                fault_kind = %fault.kind(),
                error = %fault.chain(),
                "Dependency unreachable after all attempts, skipping"
            ),
            FaultKind::Generic => tracing::error!(
                attempts,
                step = failure.step(),
                fault_kind = %fault.kind(),
                error = %fault.chain(),
                backtrace = %fault.backtrace(),
                "All attempts failed, skipping"
            ),
        }

        match failure {
            Failure::Probe(fault) => GateOutcome::SkippedAfterExhaustion {
                attempts,
                fault_kind: fault.kind(),
                last_error: fault.chain(),
            },
            Failure::Dependent(fault) => GateOutcome::DependentOperationFailed {
                attempts,
                last_error: fault.chain(),
            },
        }
    }
}
