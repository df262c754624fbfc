// Application configuration loaded from the environment

use std::env;
use std::str::FromStr;

/// Which store implementation backs the repositories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageBackend::Postgres => "postgres",
            StorageBackend::Memory => "memory",
        }
    }
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(ConfigError::Invalid {
                key: "STORAGE_BACKEND",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set in environment")]
    Missing(&'static str),

    #[error("invalid value '{value}' for {key}")]
    Invalid { key: &'static str, value: String },
}

/// Rate limit applied to every client IP
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Requests a client may make before being throttled
    pub burst: u32,
    /// One request slot comes back every `replenish_ms` milliseconds
    pub replenish_ms: u64,
}

impl Default for RateLimitConfig {
    /// 100 requests per 15 minutes
    fn default() -> Self {
        Self {
            burst: 100,
            replenish_ms: 9_000,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub storage: StorageBackend,
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub cache_url: Option<String>,
    pub cache_prefix: String,
    pub rate_limit: RateLimitConfig,
}

impl AppConfig {
    /// Read configuration from process environment variables.
    ///
    /// `JWT_SECRET` is always required; `DATABASE_URL` only when the
    /// postgres backend is selected.
    pub fn from_env() -> Result<Self, ConfigError> {
        let storage = match non_empty("STORAGE_BACKEND") {
            Some(value) => value.parse()?,
            None => StorageBackend::Postgres,
        };

        let database_url = non_empty("DATABASE_URL");
        if storage == StorageBackend::Postgres && database_url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        let jwt_secret = non_empty("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let defaults = RateLimitConfig::default();
        let rate_limit = RateLimitConfig {
            burst: parse_or("RATE_LIMIT_BURST", defaults.burst)?,
            replenish_ms: parse_or("RATE_LIMIT_REPLENISH_MS", defaults.replenish_ms)?,
        };

        Ok(Self {
            host: non_empty("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or("PORT", 5001)?,
            storage,
            database_url,
            jwt_secret,
            cache_url: non_empty("CACHE_REDIS"),
            cache_prefix: non_empty("CACHE_PREFIX").unwrap_or_else(|| "school".to_string()),
            rate_limit,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_or<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match non_empty(key) {
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}
