//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (attempts >= 1, timeouts > 0, ports valid)
//! - Check that the database address resolves to `host:port`
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GateConfig → Result<(), Vec<ValidationError>>

use thiserror::Error;

use crate::config::schema::GateConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a parsed configuration.
pub fn validate_config(config: &GateConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.database.url.is_none() {
        if config.database.host.trim().is_empty() {
            errors.push(ValidationError::new("database.host", "must not be empty"));
        }
        if config.database.port == 0 {
            errors.push(ValidationError::new("database.port", "must be between 1 and 65535"));
        }
    } else if let Err(message) = config.database.address() {
        errors.push(ValidationError::new("database.url", message));
    }

    if config.database.connect_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "database.connect_timeout_secs",
            "must be greater than 0",
        ));
    }

    if config.migrate.max_attempts == 0 {
        errors.push(ValidationError::new("migrate.max_attempts", "must be at least 1"));
    }

    if config.boot.max_attempts == 0 {
        errors.push(ValidationError::new("boot.max_attempts", "must be at least 1"));
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!("unknown level '{}'", config.observability.log_level),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&GateConfig::default()).is_ok());
    }

    #[test]
    fn test_reports_every_error() {
        let mut config = GateConfig::default();
        config.database.port = 0;
        config.database.connect_timeout_secs = 0;
        config.migrate.max_attempts = 0;
        config.boot.max_attempts = 0;
        config.observability.log_level = "loud".to_string();

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "database.port",
                "database.connect_timeout_secs",
                "migrate.max_attempts",
                "boot.max_attempts",
                "observability.log_level",
            ]
        );
    }

    #[test]
    fn test_zero_delay_allowed() {
        let mut config = GateConfig::default();
        config.migrate.delay_secs = 0;
        config.boot.delay_secs = 0;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_bad_url_reported() {
        let mut config = GateConfig::default();
        config.database.url = Some("mysql://".to_string());

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "database.url");
    }
}
