//! Application configuration management.

use chrono_tz::Tz;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// JWT configuration.
    pub jwt: JwtConfig,
    /// Domain settings.
    #[serde(default)]
    pub app: AppSettings,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Upper bound for a single request, aggregations included.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_request_timeout() -> u64 {
    30
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// JWT configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    /// Secret key for verifying tokens.
    pub secret: String,
}

/// Domain settings.
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    /// IANA time zone used when a request carries no offset of its own.
    #[serde(default = "default_timezone")]
    pub default_timezone: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            default_timezone: default_timezone(),
        }
    }
}

fn default_timezone() -> String {
    "America/Sao_Paulo".to_string()
}

impl AppSettings {
    /// Parses the configured default time zone.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is not a known IANA time zone.
    pub fn timezone(&self) -> Result<Tz, config::ConfigError> {
        self.default_timezone.parse::<Tz>().map_err(|e| {
            config::ConfigError::Message(format!(
                "invalid app.default_timezone {:?}: {e}",
                self.default_timezone
            ))
        })
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("MONETA").separator("__"))
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.app.timezone()?;
        Ok(config)
    }
}
