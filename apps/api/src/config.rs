//! API configuration module.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults. A `.env` file in the working directory is read first, if present.

use serde::{Deserialize, Serialize};
use std::env;
use std::net::SocketAddr;

/// API server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// HTTP listen port
    pub port: u16,

    /// Listen address
    pub bind_addr: String,

    /// SQLite database file path
    pub db_path: String,

    /// Max pooled database connections
    pub db_max_connections: u32,
}

impl ApiConfig {
    /// Load configuration from `.env` and environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        // A missing .env file is fine; real env vars still apply.
        let _ = dotenvy::dotenv();
        Self::from_env()
    }

    /// Load configuration from environment variables only.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = ApiConfig {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("PORT".to_string()))?,

            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0".to_string()),

            db_path: env::var("DB_CONN")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| "kasir.db".to_string()),

            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("DB_MAX_CONNECTIONS".to_string()))?,
        };

        if config.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue("DB_MAX_CONNECTIONS".to_string()));
        }

        Ok(config)
    }

    /// The socket address to listen on.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.bind_addr, self.port)
            .parse()
            .map_err(|_| ConfigError::InvalidValue("BIND_ADDR".to_string()))
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_socket_addr() {
        let config = ApiConfig {
            port: 9000,
            bind_addr: "127.0.0.1".to_string(),
            db_path: "kasir.db".to_string(),
            db_max_connections: 5,
        };
        assert_eq!(config.socket_addr().unwrap().port(), 9000);

        let bad = ApiConfig {
            bind_addr: "not an address".to_string(),
            ..config
        };
        assert!(matches!(bad.socket_addr(), Err(ConfigError::InvalidValue(_))));
    }
}
