// src/config.rs
use std::fmt;
use std::net::{IpAddr, Ipv4Addr};

const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{key} must be set"),
            ConfigError::Invalid { key, value } => write!(f, "{key} has an invalid value: {value}"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct Config {
    /// `None` selects the in-memory store.
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub host: IpAddr,
    pub port: u16,
    pub jwt_secret: String,
}

impl Config {
    /// Reads the process environment (after `.env`, if present, is loaded).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let jwt_secret = lookup("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let host = match lookup("HOST") {
            Some(h) => h
                .parse()
                .map_err(|_| ConfigError::Invalid { key: "HOST", value: h })?,
            None => DEFAULT_HOST,
        };

        let port = lookup("PORT")
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let max_connections = lookup("DATABASE_MAX_CONNECTIONS")
            .and_then(|n| n.parse::<u32>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_MAX_CONNECTIONS);

        Ok(Self {
            database_url: lookup("DATABASE_URL").filter(|s| !s.is_empty()),
            max_connections,
            host,
            port,
            jwt_secret,
        })
    }
}
