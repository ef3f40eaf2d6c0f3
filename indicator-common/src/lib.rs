//! Indicator Common - Shared configuration, errors, and logging for the
//! indicator site tools.
//!
//! This crate provides:
//! - Configuration types and loading (file, environment, defaults)
//! - Configuration validation
//! - Error types and handling utilities
//! - Logging setup

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod logging;
pub mod validation;

pub use config::{LauncherConfig, ObservabilityConfig, ToolsConfig, ValidatorConfig};
pub use error::{Error, Result};
pub use validation::{Validate, ValidationError, ValidationResult};
