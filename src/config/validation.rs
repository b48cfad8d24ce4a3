//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Verify every rule compiles (valid target origin, rooted prefix,
//!   strip literal compatible with the match prefix)
//! - Validate addresses
//! - Detect duplicate rule names
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: DevServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before the config is accepted; a failure refuses startup

use std::collections::HashSet;
use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::DevServerConfig;
use crate::routing::{RuleEngine, RuleError};

/// A semantic problem with the configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("listener.bind_address {0:?} is not a valid socket address")]
    BindAddress(String),

    #[error("observability.metrics_address {0:?} is not a valid socket address")]
    MetricsAddress(String),

    #[error("duplicate rule name {0:?}")]
    DuplicateRuleName(String),

    #[error(transparent)]
    Rule(#[from] RuleError),
}

/// Semantic validation. Returns every problem found.
pub fn validate_config(config: &DevServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    let mut seen = HashSet::new();
    for rule in &config.rules {
        if !seen.insert(rule.name.as_str()) {
            errors.push(ValidationError::DuplicateRuleName(rule.name.clone()));
        }
    }

    if let Err(rule_errors) = RuleEngine::compile(&config.rules) {
        errors.extend(rule_errors.into_iter().map(ValidationError::from));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
