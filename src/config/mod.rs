//! Application configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Variables use the `HEALTH_TRIAGE` prefix
//! and nested values are separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use health_triage::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod ai;
mod channels;
mod delivery;
mod dispatch;
mod engine;
mod error;
mod server;

pub use ai::AiConfig;
pub use channels::ChannelsConfig;
pub use delivery::DeliverySettings;
pub use dispatch::DispatchConfig;
pub use engine::EngineConfig;
pub use error::{ConfigError, ValidationError};
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults, so an empty environment yields a runnable
/// development setup with templated replies and hotline-only escalation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    /// Timeouts and hotline
    #[serde(default)]
    pub engine: EngineConfig,

    /// Outbound push retry policy
    #[serde(default)]
    pub delivery: DeliverySettings,

    /// Health worker roster
    #[serde(default)]
    pub dispatch: DispatchConfig,

    /// LLM reply provider
    #[serde(default)]
    pub ai: AiConfig,

    /// Webhook secrets
    #[serde(default)]
    pub channels: ChannelsConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `HEALTH_TRIAGE` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// - `HEALTH_TRIAGE__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `HEALTH_TRIAGE__ENGINE__EMERGENCY_HOTLINE=112` -> `engine.emergency_hotline`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("HEALTH_TRIAGE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for the first invalid value.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.engine.validate()?;
        self.delivery.validate()?;
        self.ai.validate()?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn clear_env() {
        env::remove_var("HEALTH_TRIAGE__SERVER__PORT");
        env::remove_var("HEALTH_TRIAGE__SERVER__ENVIRONMENT");
        env::remove_var("HEALTH_TRIAGE__ENGINE__EMERGENCY_HOTLINE");
        env::remove_var("HEALTH_TRIAGE__DISPATCH__ROSTER_PATH");
        env::remove_var("HEALTH_TRIAGE__DISPATCH__ASSIGNMENT_TTL_SECS");
    }

    #[test]
    fn test_load_with_empty_environment_uses_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let config = AppConfig::load().unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.engine.emergency_hotline, "108");
        assert_eq!(config.delivery.max_attempts, 3);
        assert!(!config.ai.is_enabled());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_nested_overrides() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("HEALTH_TRIAGE__SERVER__PORT", "3000");
        env::set_var("HEALTH_TRIAGE__ENGINE__EMERGENCY_HOTLINE", "112");
        env::set_var("HEALTH_TRIAGE__DISPATCH__ROSTER_PATH", "/etc/triage/roster.yaml");
        env::set_var("HEALTH_TRIAGE__DISPATCH__ASSIGNMENT_TTL_SECS", "600");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.engine.emergency_hotline, "112");
        assert_eq!(config.dispatch.roster_path(), Some("/etc/triage/roster.yaml"));
        assert_eq!(config.dispatch.assignment_ttl_secs, 600);
    }

    #[test]
    fn test_is_production() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("HEALTH_TRIAGE__SERVER__ENVIRONMENT", "production");
        let result = AppConfig::load();
        clear_env();

        assert!(result.unwrap().is_production());
    }
}
