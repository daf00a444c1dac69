//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! startup-gate.toml (or --config <path>)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → GateConfig (validated, immutable)
//!     → CLI overrides (--max-attempts, --delay)
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_or_default, ConfigError};
pub use schema::{DatabaseConfig, GateConfig, LogFormat, MigrateConfig, ObservabilityConfig, RetryConfig};
pub use validation::ValidationError;
