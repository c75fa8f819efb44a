use std::{env, net::SocketAddr, str::FromStr};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub sql_logging: bool,
}

#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub access_token_secret: String,
    pub access_token_ttl_minutes: i64,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
}

impl AppConfig {
    /// Reads the process environment; call `dotenvy::dotenv()` first to pick up `.env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| lookup(name).ok_or(ConfigError::Missing(name));

        Ok(Self {
            bind_addr: parse_or(&lookup, "BIND_ADDR", SocketAddr::from(([0, 0, 0, 0], 3500)))?,
            database: DatabaseConfig {
                url: required("DATABASE_URL")?,
                max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 10)?,
                min_connections: parse_or(&lookup, "DATABASE_MIN_CONNECTIONS", 1)?,
                sql_logging: parse_or(&lookup, "DATABASE_SQL_LOGGING", false)?,
            },
            security: SecurityConfig {
                access_token_secret: required("ACCESS_TOKEN_SECRET")?,
                access_token_ttl_minutes: parse_or(&lookup, "ACCESS_TOKEN_TTL_MINUTES", 15)?,
            },
        })
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}
