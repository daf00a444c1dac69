//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Boot (wait-for-db):
//!     Load config → TcpProbe → StartupGate(boot policy) → outcome
//!
//! Deploy (migrate-safe):
//!     Load config → TcpProbe + CommandRunner → StartupGate(migrate policy) → outcome
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then dependency, then dependent task
//! - Outcomes are reported, never escalated to a non-zero exit

pub mod startup;

pub use startup::{migrate_safe, wait_for_database, RetryOverrides, StartupError};
