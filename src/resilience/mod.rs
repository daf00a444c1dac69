//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Process start:
//!     → gate.rs (probe dependency, run dependent task)
//!     → On failure: retries.rs (attempts left?) → delay.rs (fixed delay)
//!     → On exhaustion: soft GateOutcome, error-level log entry
//! ```
//!
//! # Design Decisions
//! - Fixed delay, no jitter: one caller per process start
//! - Connectivity and generic faults are retried identically
//! - No fault crosses the gate boundary

pub mod delay;
pub mod fault;
pub mod gate;
pub mod retries;

pub use delay::{Sleeper, TokioSleeper};
pub use fault::{Fault, FaultKind};
pub use gate::{GateOutcome, StartupGate};
pub use retries::RetryPolicy;
