//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, ports valid)
//! - Check that the selected log output has what it needs
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServiceConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use crate::config::schema::{LogFormat, LogOutput, ServiceConfig};

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("server.port must not be 0")]
    ZeroPort,

    #[error("server.host must not be empty")]
    EmptyHost,

    #[error("server.request_timeout_secs must be greater than 0")]
    ZeroTimeout,

    #[error("logging.log_name must not be empty")]
    EmptyLogName,

    #[error("logging.path is required when logging.output = \"file\"")]
    MissingLogPath,
}

/// Check `config`, collecting every problem found.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.port == 0 {
        errors.push(ValidationError::ZeroPort);
    }
    if config.server.host.trim().is_empty() {
        errors.push(ValidationError::EmptyHost);
    }
    if config.server.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }
    if config.logging.log_name.trim().is_empty() {
        errors.push(ValidationError::EmptyLogName);
    }
    if config.logging.format == LogFormat::Json
        && config.logging.output == LogOutput::File
        && config.logging.path.is_none()
    {
        errors.push(ValidationError::MissingLogPath);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
