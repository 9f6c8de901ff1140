use std::env;
use std::fmt;

use chrono::Duration;

use crate::auth::password::DEFAULT_COST;

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_JWT_EXPIRES_IN: &str = "24h";

/// Longest accepted token lifetime: ten years.
pub const MAX_JWT_EXPIRES_IN_SECS: i64 = 10 * 365 * 24 * 60 * 60;

/// Process-wide settings, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL URL. `None` selects the in-memory store.
    pub database_url: Option<String>,
    pub server_port: u16,
    pub server_host: String,
    pub jwt_secret: String,
    pub jwt_expires_in: Duration,
    /// Allowed CORS origin. `None` allows any origin.
    pub cors_origin: Option<String>,
    pub bcrypt_cost: u32,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{} must be set", key),
            ConfigError::Invalid { key, value } => write!(f, "{} has an invalid value: {:?}", key, value),
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let jwt_secret = get("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let server_port = match get("SERVER_PORT") {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                key: "SERVER_PORT",
                value,
            })?,
            None => DEFAULT_PORT,
        };

        let expires_in = get("JWT_EXPIRES_IN").unwrap_or_else(|| DEFAULT_JWT_EXPIRES_IN.to_string());
        let jwt_expires_in = parse_duration(&expires_in).ok_or(ConfigError::Invalid {
            key: "JWT_EXPIRES_IN",
            value: expires_in.clone(),
        })?;

        let bcrypt_cost = match get("BCRYPT_COST") {
            Some(value) => value
                .parse()
                .ok()
                .filter(|cost| (4..=31).contains(cost))
                .ok_or(ConfigError::Invalid {
                    key: "BCRYPT_COST",
                    value,
                })?,
            None => DEFAULT_COST,
        };

        Ok(Self {
            database_url: get("DATABASE_URL"),
            server_port,
            server_host: get("SERVER_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            jwt_secret,
            jwt_expires_in,
            cors_origin: get("CORS_ORIGIN"),
            bcrypt_cost,
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

/// Parses lifetimes such as `90`, `90s`, `30m`, `24h` or `7d`. Must be positive and
/// at most [`MAX_JWT_EXPIRES_IN_SECS`].
pub fn parse_duration(value: &str) -> Option<Duration> {
    let value = value.trim();
    let (digits, unit) = match value.char_indices().last()? {
        (idx, c) if c.is_ascii_alphabetic() => (&value[..idx], c),
        _ => (value, 's'),
    };

    let amount: i64 = digits.parse().ok().filter(|n| *n > 0)?;
    let seconds = match unit.to_ascii_lowercase() {
        's' => amount,
        'm' => amount.checked_mul(60)?,
        'h' => amount.checked_mul(60 * 60)?,
        'd' => amount.checked_mul(60 * 60 * 24)?,
        _ => return None,
    };
    if seconds > MAX_JWT_EXPIRES_IN_SECS {
        return None;
    }
    Duration::try_seconds(seconds)
}
