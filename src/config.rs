// Runtime configuration read from the environment (and .env via dotenv)

use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("DATABASE_URL must be set when STORAGE_BACKEND is postgres")]
    MissingDatabaseUrl,

    #[error("Invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },
}

/// Where price records live
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" | "in-memory" => Ok(StorageBackend::Memory),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub api_prefix: String,
    pub storage: StorageBackend,
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub log_filter: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let storage = match lookup("STORAGE_BACKEND") {
            Some(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
                key: "STORAGE_BACKEND",
                value,
            })?,
            None => StorageBackend::Postgres,
        };

        let database_url = lookup("DATABASE_URL").filter(|url| !url.is_empty());
        if storage == StorageBackend::Postgres && database_url.is_none() {
            return Err(ConfigError::MissingDatabaseUrl);
        }

        let port = parse_or(&lookup, "PORT", 8080)?;
        let max_connections = parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 5)?;

        let api_prefix = normalize_prefix(&lookup("API_PREFIX").unwrap_or_else(|| "/api".to_string()));

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            api_prefix,
            storage,
            database_url,
            max_connections,
            log_filter: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Mount point of the price resource
    pub fn prices_path(&self) -> String {
        format!("{}/prices", self.api_prefix)
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value }),
        None => Ok(default),
    }
}

/// "/api/" and "api" both become "/api"; an empty prefix mounts at the root
fn normalize_prefix(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}
