//! Shared configuration for the JWT auth workspace
//!
//! This crate provides the configuration consumed by the token service and
//! the operator binary:
//! - Configuration types and layered loading
//! - Configuration error types

pub mod config;
pub mod errors;

// Re-export commonly used items at crate root
pub use crate::config::{AppConfig, Environment, JwtConfig, LogFormat, LoggingConfig};
pub use crate::errors::ConfigError;
