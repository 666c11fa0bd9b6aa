//! Application configuration module
//!
//! The web application is configured from environment variables using the
//! `config` and `dotenvy` crates, with the `DEVBETTER` prefix and `__`
//! separating nested values. The uploader is configured from its command line
//! (see [`UploaderArgs`]).
//!
//! # Example
//!
//! ```no_run
//! use devbetter::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod archive;
mod database;
mod error;
mod payment;
mod server;
mod uploader;

pub use archive::ArchiveConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use payment::PaymentConfig;
pub use server::{Environment, ServerConfig};
pub use uploader::{UploaderArgs, UploaderSettings, UsageError};

use serde::Deserialize;

/// Root configuration of the web application.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    pub database: DatabaseConfig,

    /// Stripe credentials
    pub payment: PaymentConfig,

    #[serde(default)]
    pub archive: ArchiveConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with the `DEVBETTER` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// - `DEVBETTER__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `DEVBETTER__PAYMENT__STRIPE_API_KEY=...` -> `payment.stripe_api_key = ...`
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("DEVBETTER")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.database
            .validate_against_request_timeout(self.server.request_timeout())?;
        self.payment.validate()?;
        self.archive.validate()?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
