//! Application settings loaded from environment variables.

use std::env;

use super::constants::{DEFAULT_DATABASE_URL, DEFAULT_MAX_CONNECTIONS};

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Falls back to local-development defaults when a variable is unset.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_CONNECTIONS),
        }
    }
}
