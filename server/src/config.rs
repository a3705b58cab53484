// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use std::env;
use std::net::{IpAddr, SocketAddr};

const DEFAULT_DATABASE_URL: &str = "sqlite://database/taskmate.db";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Runtime settings of the server binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub database_url: String,
    pub host: IpAddr,
    pub port: u16,
}

impl ServerConfig {
    /// Loads the configuration from the environment, after reading an
    /// optional `.env` file.
    ///
    /// - `DATABASE_URL` (default `sqlite://database/taskmate.db`)
    /// - `HOST` (default `0.0.0.0`)
    /// - `PORT` (default `5000`)
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        let host = parse_or("HOST", lookup("HOST"), DEFAULT_HOST.parse().ok())?;
        let port = parse_or("PORT", lookup("PORT"), Some(DEFAULT_PORT))?;

        Ok(Self {
            database_url,
            host,
            port,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_or<T>(key: &str, value: Option<String>, default: Option<T>) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        Some(value) => value.parse().map_err(|err: T::Err| ConfigError::InvalidValue {
            key: key.to_string(),
            message: err.to_string(),
        }),
        None => default.ok_or_else(|| ConfigError::InvalidValue {
            key: key.to_string(),
            message: "no default available".to_string(),
        }),
    }
}
