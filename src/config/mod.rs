//! Configuration module for FormForge.
//!
//! Process configuration is loaded from environment variables with sensible defaults.
//! The storage backend selection lives in [`backend`] and is persisted in the key-value store.

pub mod backend;

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::errors::AppError;

pub use backend::{BackendConfig, BackendMode, RemoteCredentials};

/// Process configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the SQLite file backing the local key-value store
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let db_path = env::var("FORMFORGE_DB_PATH")
            .unwrap_or_else(|_| "./data/formforge.sqlite".to_string())
            .into();

        let bind_addr = env::var("FORMFORGE_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .map_err(|e| AppError::Internal(format!("Invalid FORMFORGE_BIND_ADDR: {}", e)))?;

        let log_level = env::var("FORMFORGE_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            db_path,
            bind_addr,
            log_level,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        // Clear any existing env vars
        env::remove_var("FORMFORGE_DB_PATH");
        env::remove_var("FORMFORGE_BIND_ADDR");
        env::remove_var("FORMFORGE_LOG_LEVEL");

        let config = Config::from_env().unwrap();

        assert_eq!(config.db_path, PathBuf::from("./data/formforge.sqlite"));
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.log_level, "info");
    }
}
