use std::net::{Ipv4Addr, SocketAddr};
use std::str::FromStr;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} is not in the correct format: {value:?}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub host: Ipv4Addr,
    pub port: u16,
    pub database: DatabaseConfig,
}

/// Store connection settings.
///
/// `url` wins over the discrete `PG*` settings when present.
#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub name: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub max_connections: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Config {
            host: parse_or(&lookup, "HOST", Ipv4Addr::UNSPECIFIED)?,
            port: parse_or(&lookup, "PORT", 3000)?,
            database: DatabaseConfig {
                url: lookup("DATABASE_URL"),
                host: lookup("PGHOST").unwrap_or_else(|| "localhost".to_string()),
                port: parse_or(&lookup, "PGPORT", 5432)?,
                name: lookup("PGDATABASE"),
                user: lookup("PGUSER"),
                password: lookup("PGPASSWORD"),
                max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 10)?,
            },
        })
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::from((self.host, self.port))
    }
}

fn parse_or<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(var) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value }),
    }
}
