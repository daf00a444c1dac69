//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! StartupGate produces:
//!     → logging.rs (structured log events inside a `startup_gate` span)
//!
//! Consumers:
//!     → stdout (pretty for operators, JSON for log aggregation)
//! ```
//!
//! # Design Decisions
//! - Run ID flows through every event of a gate run
//! - Persistent dependency failures are only visible here; the exit code
//!   stays 0, so alerting must watch the error-level events

pub mod logging;

pub use logging::{gate_span, init_logging};
