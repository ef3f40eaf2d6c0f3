//! Configuration validation for the indicator site tools.
//!
//! Checks configured values before either tool touches the network or the
//! file system.

use std::collections::HashSet;
use std::net::IpAddr;
use std::path::{Component, Path};
use thiserror::Error;

use crate::config::{LauncherConfig, ObservabilityConfig, ValidatorConfig};

/// Log levels accepted by the logging setup.
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Configuration validation error.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid port {port} for {field}: must be between 1 and 65535")]
    InvalidPort { port: u16, field: String },

    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Trait for validatable configuration sections.
pub trait Validate {
    /// Validate this configuration section.
    fn validate(&self) -> ValidationResult<()>;
}

/// Whether `s` is a `major.minor` indicator group identifier (e.g. `7.11`).
pub fn is_group_identifier(s: &str) -> bool {
    match s.split_once('.') {
        Some((major, minor)) => {
            !major.is_empty()
                && !minor.is_empty()
                && major.bytes().all(|b| b.is_ascii_digit())
                && minor.bytes().all(|b| b.is_ascii_digit())
        }
        None => false,
    }
}

impl Validate for LauncherConfig {
    fn validate(&self) -> ValidationResult<()> {
        if self.port == 0 {
            return Err(ValidationError::InvalidPort {
                port: self.port,
                field: "launcher.port".into(),
            });
        }

        if self.bind.parse::<IpAddr>().is_err() {
            return Err(ValidationError::InvalidValue {
                field: "launcher.bind".into(),
                reason: format!("'{}' is not an IP address", self.bind),
            });
        }

        if self.entry_file.trim().is_empty() {
            return Err(ValidationError::MissingField {
                field: "launcher.entry_file".into(),
            });
        }

        let entry = Path::new(&self.entry_file);
        if !entry
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
        {
            return Err(ValidationError::InvalidValue {
                field: "launcher.entry_file".into(),
                reason: "must be a relative path inside the site directory".into(),
            });
        }

        Ok(())
    }
}

impl Validate for ValidatorConfig {
    fn validate(&self) -> ValidationResult<()> {
        if self.groups.is_empty() {
            return Err(ValidationError::MissingField {
                field: "validator.groups".into(),
            });
        }

        let mut seen = HashSet::new();
        for group in &self.groups {
            if !is_group_identifier(group) {
                return Err(ValidationError::InvalidValue {
                    field: "validator.groups".into(),
                    reason: format!("'{group}' is not a major.minor identifier"),
                });
            }
            if !seen.insert(group.as_str()) {
                return Err(ValidationError::InvalidValue {
                    field: "validator.groups".into(),
                    reason: format!("'{group}' is listed twice"),
                });
            }
        }

        match self.ambiguous_policy.as_str() {
            "reject" | "first_match" => Ok(()),
            other => Err(ValidationError::InvalidValue {
                field: "validator.ambiguous_policy".into(),
                reason: format!("unknown policy '{other}' (expected reject or first_match)"),
            }),
        }
    }
}

impl Validate for ObservabilityConfig {
    fn validate(&self) -> ValidationResult<()> {
        if !LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            return Err(ValidationError::InvalidValue {
                field: "observability.log_level".into(),
                reason: format!("must be one of {}", LOG_LEVELS.join(", ")),
            });
        }

        match self.log_format.as_str() {
            "pretty" | "json" => Ok(()),
            other => Err(ValidationError::InvalidValue {
                field: "observability.log_format".into(),
                reason: format!("unknown format '{other}' (expected pretty or json)"),
            }),
        }
    }
}
