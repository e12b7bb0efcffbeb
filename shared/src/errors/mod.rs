//! Configuration error types

use thiserror::Error;

use crate::config::Environment;

/// Errors raised while loading or validating configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(#[from] validator::ValidationErrors),

    #[error("The default JWT secret must not be used in {environment}")]
    DefaultSecret { environment: Environment },
}
