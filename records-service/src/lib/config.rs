use std::env;
use std::time::Duration;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

/// Application configuration for records-service.
///
/// Loaded from configuration files with environment variable overrides.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub password: PasswordConfig,
}

/// HTTP server configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

/// Document store configuration.
///
/// Without a `url` the emulated store is used straight away.
#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    pub url: Option<String>,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_true")]
    pub fallback_to_emulated: bool,
    #[serde(default = "default_true")]
    pub seed_demo_identities: bool,
}

/// JWT authentication configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
    #[serde(default = "default_expiration_minutes")]
    pub expiration_minutes: i64,
}

/// Argon2 cost factor for credential hashing.
#[derive(Debug, Deserialize, Clone)]
pub struct PasswordConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            memory_kib: 19 * 1024,
            iterations: 2,
            parallelism: 1,
        }
    }
}

impl StoreConfig {
    /// Store settings that never touch an external database.
    pub fn emulated() -> Self {
        Self {
            url: None,
            connect_timeout_secs: default_connect_timeout_secs(),
            fallback_to_emulated: true,
            seed_demo_identities: true,
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl JwtConfig {
    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.expiration_minutes)
    }
}

fn default_connect_timeout_secs() -> u64 {
    5
}

fn default_true() -> bool {
    true
}

fn default_algorithm() -> String {
    "HS256".to_string()
}

fn default_expiration_minutes() -> i64 {
    30
}

impl Config {
    /// Load configuration from files with environment variable overrides.
    ///
    /// # Configuration Priority (highest to lowest)
    /// 1. Environment variables (STORE__URL, JWT__SECRET, SERVER__HTTP_PORT, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    ///
    /// # Returns
    /// Loaded configuration
    ///
    /// # Errors
    /// Returns error if required configuration values are missing or invalid
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on environment-specific configuration
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Layer on environment variables (with __ as separator)
            // Example: STORE__URL=postgres://... overrides store.url
            .add_source(Environment::with_prefix("").separator("__"))
            .build()?;

        configuration.try_deserialize()
    }
}
