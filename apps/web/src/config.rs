//! Web server configuration.
//!
//! Values are layered with the `config` crate, later sources winning:
//!
//! ```text
//! built-in defaults ──► ./tally.toml (optional) ──► TALLY_* environment
//! ```
//!
//! e.g. `TALLY_PORT=8080 TALLY_REDIS_URL=redis://127.0.0.1/ tally-web`

use std::path::PathBuf;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use serde::Deserialize;

/// Development signing key. Anyone who knows it can forge sessions.
pub const DEV_SESSION_SECRET: &str = "tally-development-session-secret-change-me";

/// Shortest accepted session secret, in bytes (HS256 key size).
pub const MIN_SESSION_SECRET_LEN: usize = 32;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 4567;
const DEFAULT_DATABASE_PATH: &str = "./tally.db";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_SESSION_LIFETIME_SECS: i64 = 7 * 24 * 60 * 60;

/// Web server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Interface to bind
    pub host: String,

    /// HTTP port
    pub port: u16,

    /// SQLite database file
    pub database_path: PathBuf,

    /// Connection pool size
    pub max_connections: u32,

    /// Redis connection string for the user store (optional)
    pub redis_url: Option<String>,

    /// HS256 key for the session cookie
    pub session_secret: String,

    /// Session cookie lifetime in seconds
    pub session_lifetime_secs: i64,

    /// Add `Secure` to the session cookie (serve over HTTPS only)
    pub secure_cookies: bool,
}

impl AppConfig {
    /// Load configuration from defaults, `tally.toml` and `TALLY_*` variables.
    pub fn load() -> Result<Self, ConfigError> {
        let builder = Self::defaults()?
            .add_source(File::with_name("tally").required(false))
            .add_source(Environment::with_prefix("TALLY").try_parsing(true));

        Self::from_builder(builder)
    }

    /// Builder pre-populated with the built-in defaults.
    pub fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let builder = Config::builder()
            .set_default("host", DEFAULT_HOST)?
            .set_default("port", i64::from(DEFAULT_PORT))?
            .set_default("database_path", DEFAULT_DATABASE_PATH)?
            .set_default("max_connections", i64::from(DEFAULT_MAX_CONNECTIONS))?
            .set_default("session_secret", DEV_SESSION_SECRET)?
            .set_default("session_lifetime_secs", DEFAULT_SESSION_LIFETIME_SECS)?
            .set_default("secure_cookies", false)?;

        Ok(builder)
    }

    /// Build, deserialize and validate.
    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the server cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.session_secret.len() < MIN_SESSION_SECRET_LEN {
            return Err(ConfigError::InvalidValue(format!(
                "session_secret (must be at least {} bytes)",
                MIN_SESSION_SECRET_LEN
            )));
        }

        if self.session_lifetime_secs <= 0 {
            return Err(ConfigError::InvalidValue("session_lifetime_secs".to_string()));
        }

        if self.max_connections == 0 {
            return Err(ConfigError::InvalidValue("max_connections".to_string()));
        }

        Ok(())
    }

    /// `host:port` for the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Whether the session key is still the published development one.
    pub fn uses_dev_secret(&self) -> bool {
        self.session_secret == DEV_SESSION_SECRET
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_builder(AppConfig::defaults().unwrap()).unwrap();

        assert_eq!(config.bind_address(), "127.0.0.1:4567");
        assert_eq!(config.database_path, PathBuf::from("./tally.db"));
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.redis_url, None);
        assert_eq!(config.session_lifetime_secs, 604_800);
        assert!(!config.secure_cookies);
        assert!(config.uses_dev_secret());
    }

    #[test]
    fn test_overrides() {
        let builder = AppConfig::defaults()
            .unwrap()
            .set_override("port", 8080_i64)
            .unwrap()
            .set_override("redis_url", "redis://127.0.0.1/")
            .unwrap();
        let config = AppConfig::from_builder(builder).unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.redis_url.as_deref(), Some("redis://127.0.0.1/"));
    }

    #[test]
    fn test_short_secret_rejected() {
        let builder = AppConfig::defaults()
            .unwrap()
            .set_override("session_secret", "too-short")
            .unwrap();

        let err = AppConfig::from_builder(builder).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(_)));
    }
}
