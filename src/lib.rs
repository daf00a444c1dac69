//! Startup gate: bounded-retry dependency checks for process start.

pub mod config;
pub mod lifecycle;
pub mod observability;
pub mod probe;
pub mod resilience;
pub mod task;

pub use config::GateConfig;
pub use resilience::{GateOutcome, StartupGate};
