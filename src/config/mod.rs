//! Configuration management
//!
//! This module handles loading and parsing configuration for recipebook.
//! Configuration can be loaded from:
//! - config.yml file
//! - Environment variables (override file settings)
//!
//! Missing optional values are filled with sensible defaults.

use serde::{Deserialize, Serialize};

use crate::models::Language;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,
    /// List pagination
    #[serde(default)]
    pub pagination: PaginationConfig,
    /// Content language negotiation
    #[serde(default)]
    pub i18n: I18nConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
    /// CORS allowed origin
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "http://localhost:3000".to_string()
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite file path or `sqlite:` URL; `:memory:` for an in-memory database
    #[serde(default = "default_database_url")]
    pub url: String,
    /// Maximum pooled connections
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
        }
    }
}

fn default_database_url() -> String {
    "data/recipebook.db".to_string()
}

fn default_max_connections() -> u32 {
    20
}

/// Pagination configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Page size used when the request has none, or an unknown one
    #[serde(default = "default_limit")]
    pub default_limit: u32,
    /// Page sizes a client may ask for
    #[serde(default = "default_allowed_limits")]
    pub allowed_limits: Vec<u32>,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            allowed_limits: default_allowed_limits(),
        }
    }
}

fn default_limit() -> u32 {
    10
}

fn default_allowed_limits() -> Vec<u32> {
    vec![10, 20, 50]
}

/// Internationalization configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct I18nConfig {
    /// Language used when the request names none we support
    #[serde(default)]
    pub default_language: Language,
}

/// Error type for configuration parsing
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    FileRead {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {message}")]
    ParseError {
        path: String,
        message: String,
    },
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

impl Config {
    /// Load configuration from file
    ///
    /// If the file doesn't exist, returns default configuration.
    /// If the file exists but is invalid YAML, returns an error with details.
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.display().to_string(),
            source: e,
        })?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = serde_yaml::from_str(&content).map_err(|e| {
            ConfigError::ParseError {
                path: path.display().to_string(),
                message: format_yaml_error(&e),
            }
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file with environment variable overrides
    ///
    /// Environment variables follow the pattern:
    /// - RECIPEBOOK_SERVER_HOST
    /// - RECIPEBOOK_SERVER_PORT
    /// - RECIPEBOOK_SERVER_CORS_ORIGIN
    /// - RECIPEBOOK_DATABASE_URL
    /// - RECIPEBOOK_PAGINATION_DEFAULT_LIMIT
    /// - RECIPEBOOK_I18N_DEFAULT_LANGUAGE
    pub fn load_with_env(path: &std::path::Path) -> anyhow::Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides to the configuration
    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("RECIPEBOOK_SERVER_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("RECIPEBOOK_SERVER_PORT") {
            if let Ok(port) = port.parse::<u16>() {
                self.server.port = port;
            }
        }
        if let Ok(cors_origin) = std::env::var("RECIPEBOOK_SERVER_CORS_ORIGIN") {
            self.server.cors_origin = cors_origin;
        }

        if let Ok(url) = std::env::var("RECIPEBOOK_DATABASE_URL") {
            self.database.url = url;
        }

        if let Ok(limit) = std::env::var("RECIPEBOOK_PAGINATION_DEFAULT_LIMIT") {
            if let Ok(limit) = limit.parse::<u32>() {
                self.pagination.default_limit = limit;
            }
        }

        if let Ok(language) = std::env::var("RECIPEBOOK_I18N_DEFAULT_LANGUAGE") {
            if let Some(language) = Language::from_code(&language) {
                self.i18n.default_language = language;
            }
        }
    }

    /// Check cross-field constraints that serde cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        let pagination = &self.pagination;
        if pagination.allowed_limits.is_empty() {
            return Err(ConfigError::ValidationError(
                "pagination.allowed_limits must not be empty".to_string(),
            ));
        }
        if pagination.allowed_limits.contains(&0) || pagination.default_limit == 0 {
            return Err(ConfigError::ValidationError(
                "pagination limits must be greater than zero".to_string(),
            ));
        }
        if !pagination.allowed_limits.contains(&pagination.default_limit) {
            return Err(ConfigError::ValidationError(format!(
                "pagination.default_limit {} is not one of allowed_limits {:?}",
                pagination.default_limit, pagination.allowed_limits
            )));
        }
        Ok(())
    }
}

/// Format YAML parsing error with location and context
fn format_yaml_error(e: &serde_yaml::Error) -> String {
    if let Some(location) = e.location() {
        format!(
            "at line {}, column {}: {}",
            location.line(),
            location.column(),
            e
        )
    } else {
        e.to_string()
    }
}

// Shared by every test that touches RECIPEBOOK_* variables.
#[cfg(test)]
static CONFIG_ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());
