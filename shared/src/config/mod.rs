//! Configuration module with business-specific sub-modules
//!
//! - `auth` - Access-token signing secret and lifetime
//! - `environment` - Environment detection and logging configuration

pub mod auth;
pub mod environment;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::errors::ConfigError;

// Re-export commonly used types
pub use auth::{
    JwtConfig, DEFAULT_ACCESS_TOKEN_EXPIRATION_MILLIS, DEFAULT_JWT_SECRET, MAX_ACCESS_TOKEN_EXPIRATION_MILLIS,
};
pub use environment::{Environment, LogFormat, LoggingConfig};

/// Prefix of environment variables overriding file configuration,
/// e.g. `APP__JWT__SECRET`
pub const ENV_PREFIX: &str = "APP";

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    #[serde(default)]
    pub environment: Environment,

    /// Token signing configuration
    #[serde(default)]
    pub jwt: JwtConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            jwt: JwtConfig::default(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Create configuration for development environment
    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            jwt: JwtConfig::default(),
            logging: LoggingConfig::for_environment(Environment::Development),
        }
    }

    /// Load configuration from `config/default`, `config/<environment>` and
    /// `APP__*` environment variables, in increasing precedence, then validate it
    pub fn load() -> Result<Self, ConfigError> {
        let environment = Environment::from_env();

        let logging = LoggingConfig::for_environment(environment);

        let settings = ::config::Config::builder()
            .set_default("environment", environment.to_string())?
            .set_default("logging.level", logging.level)?
            .set_default("logging.format", logging.format.as_str())?
            .add_source(::config::File::with_name("config/default").required(false))
            .add_source(::config::File::with_name(environment.config_file()).required(false))
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate field constraints and environment-specific rules
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.jwt.validate()?;

        if self.environment.is_production() && self.jwt.is_using_default_secret() {
            return Err(ConfigError::DefaultSecret {
                environment: self.environment,
            });
        }

        Ok(())
    }
}
