//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses, patterns and value ranges
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: MockConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use axum::http::StatusCode;
use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::MockConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid {field} `{value}`: expected host:port")]
    InvalidAddress { field: &'static str, value: String },

    #[error("routes.file_pattern must be a valid file name glob, got `{0}`")]
    InvalidFilePattern(String),

    #[error("timeouts.request_secs must be greater than 0")]
    ZeroTimeout,

    #[error("fallback.status {0} is not a valid HTTP status code")]
    InvalidFallbackStatus(u16),

    #[error("admin.api_key must not be empty when the admin API is enabled")]
    EmptyApiKey,
}

/// Check the configuration for semantic errors.
pub fn validate_config(config: &MockConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    let pattern = &config.routes.file_pattern;
    let is_file_glob = !pattern.is_empty()
        && !pattern.contains(['/', '\\'])
        && glob::Pattern::new(pattern).is_ok();
    if !is_file_glob {
        errors.push(ValidationError::InvalidFilePattern(pattern.clone()));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if StatusCode::from_u16(config.fallback.status).is_err() {
        errors.push(ValidationError::InvalidFallbackStatus(config.fallback.status));
    }

    let observability = &config.observability;
    if observability.metrics_enabled
        && observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: observability.metrics_address.clone(),
        });
    }

    if config.admin.enabled && config.admin.api_key.trim().is_empty() {
        errors.push(ValidationError::EmptyApiKey);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
