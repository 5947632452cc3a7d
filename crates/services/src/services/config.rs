//! Process configuration, read from the environment (and `.env` via the
//! binary's startup).

use thiserror::Error;
use utils::env::{parse_port, split_list};

const DEV_JWT_SECRET: &str = "pathos-development-secret-change-me";

/// Ten years
pub const MAX_JWT_TTL_HOURS: i64 = 24 * 365 * 10;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    /// 0 lets the OS pick a free port
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_ttl_hours: i64,
    pub bcrypt_cost: u32,
    pub license_keys: Vec<String>,
    pub history_database_url: Option<String>,
    pub cors_origins: Vec<String>,
    pub sentry_dsn: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0,
            jwt_secret: DEV_JWT_SECRET.to_string(),
            jwt_ttl_hours: 24,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            license_keys: Vec::new(),
            history_database_url: None,
            cors_origins: Vec::new(),
            sentry_dsn: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup. Blank values
    /// are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let host = get("HOST").unwrap_or(defaults.host);

        let port = match get("BACKEND_PORT").or_else(|| get("PORT")) {
            Some(raw) => parse_port(&raw).ok_or(ConfigError::Invalid {
                key: "PORT",
                value: raw,
            })?,
            None => defaults.port,
        };

        let jwt_secret = match get("JWT_SECRET") {
            Some(secret) => secret,
            None if cfg!(debug_assertions) => {
                tracing::warn!("JWT_SECRET not set, using the development secret");
                defaults.jwt_secret
            }
            None => return Err(ConfigError::Missing("JWT_SECRET")),
        };

        let jwt_ttl_hours = match get("JWT_TTL_HOURS") {
            Some(raw) => match raw.trim().parse::<i64>() {
                Ok(hours) if hours > 0 && hours <= MAX_JWT_TTL_HOURS => hours,
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "JWT_TTL_HOURS",
                        value: raw,
                    });
                }
            },
            None => defaults.jwt_ttl_hours,
        };

        let bcrypt_cost = match get("BCRYPT_COST") {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(cost) if (4..=31).contains(&cost) => cost,
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "BCRYPT_COST",
                        value: raw,
                    });
                }
            },
            None => defaults.bcrypt_cost,
        };

        Ok(Self {
            host,
            port,
            jwt_secret,
            jwt_ttl_hours,
            bcrypt_cost,
            license_keys: get("LICENSE_KEYS")
                .map(|raw| split_list(&raw))
                .unwrap_or_default(),
            history_database_url: get("HISTORY_DATABASE_URL"),
            cors_origins: get("CORS_ORIGINS")
                .map(|raw| split_list(&raw))
                .unwrap_or_default(),
            sentry_dsn: get("SENTRY_DSN"),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
