// src/config.rs

use std::{
    env, fmt, fs, io,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;
use validator::Validate;

/// Environment variable naming the YAML config file.
pub const CONFIG_PATH_ENV: &str = "DATABASE_API_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "database_api_config.yaml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("cannot parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid config: {0}")]
    Invalid(#[from] validator::ValidationErrors),
}

/// Service configuration, loaded from YAML. Missing keys take defaults.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct Config {
    #[validate(nested)]
    pub api_config: ApiConfig,
    #[validate(nested)]
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
}

/// Listener settings.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(default)]
pub struct ApiConfig {
    #[validate(length(min = 1, message = "api_config.host cannot be empty"))]
    pub host: String,
    #[validate(range(min = 1, message = "api_config.port must be positive"))]
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 6000,
        }
    }
}

impl ApiConfig {
    /// `host:port` for the TCP listener.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Clone, Deserialize, Validate)]
#[serde(default)]
pub struct DatabaseConfig {
    #[validate(length(min = 1, message = "database.database_name cannot be empty"))]
    pub database_name: String,
    #[validate(length(min = 1, message = "database.host cannot be empty"))]
    pub host: String,
    #[validate(range(min = 1, message = "database.port must be positive"))]
    pub port: u16,
    #[validate(length(min = 1, message = "database.user cannot be empty"))]
    pub user: String,
    pub password: String,
    /// `false` disables TLS, `true` requires it.
    pub sslmode: bool,
    #[validate(range(min = 1, message = "database.max_connections must be positive"))]
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            database_name: "trivia".to_string(),
            host: "localhost".to_string(),
            port: 5433,
            user: "trivia".to_string(),
            password: String::new(),
            sslmode: false,
            max_connections: 5,
        }
    }
}

// Keeps the password out of logs.
impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("database_name", &self.database_name)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"**************")
            .field("sslmode", &self.sslmode)
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub directory: String,
    pub file_name: String,
    /// `EnvFilter` directive, overridden by `RUST_LOG`.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: "logs".to_string(),
            file_name: "database_api.log".to_string(),
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Reads, parses and validates the config file at `path`.
    ///
    /// The file has to exist. `RUST_LOG` overrides `logging.level`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let mut config = Self::parse(&raw)?;

        if let Ok(level) = env::var("RUST_LOG") {
            config.logging.level = level;
        }

        config.validate()?;
        Ok(config)
    }

    /// Parses YAML without validating. An empty document yields the defaults.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(raw)?)
    }

    /// Logs every loaded value, password masked.
    pub fn log_values(&self) {
        tracing::info!("Config values for database:");
        tracing::info!("database_name = {}", self.database.database_name);
        tracing::info!("host = {}", self.database.host);
        tracing::info!("port = {}", self.database.port);
        tracing::info!("user = {}", self.database.user);
        tracing::info!("password = **************");
        tracing::info!("sslmode = {}", self.database.sslmode);
        tracing::info!("max_connections = {}", self.database.max_connections);

        tracing::info!("Config values for api_config:");
        tracing::info!("host = {}", self.api_config.host);
        tracing::info!("port = {}", self.api_config.port);
    }
}

/// Config file location: `DATABASE_API_CONFIG` if set, else the default name
/// in the working directory.
pub fn config_path() -> PathBuf {
    env::var(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
}
