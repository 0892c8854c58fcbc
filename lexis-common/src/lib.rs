//! Lexis Common - Shared types, configuration, and logging for the Lexis services.
//!
//! This crate provides:
//! - Configuration types and loading (file + `LEXIS_*` environment overrides)
//! - Configuration validation
//! - Error types and handling utilities
//! - Logging setup

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod logging;
pub mod validation;

pub use config::{
    AuthConfig, Config, LexiconConfig, ObservabilityConfig, ScoringConfig, ServerConfig,
    StorageBackend, StorageConfig,
};
pub use error::{Error, Result, ResultExt};
pub use validation::{Validate, ValidationError, ValidationResult};
