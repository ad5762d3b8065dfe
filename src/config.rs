//! Startup configuration
//!
//! Values are read once from the environment in `main` and handed to the
//! application explicitly. Nothing below `main` reads environment variables.

use std::env;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DATABASE_URL: &str = "data.db";
pub const DEFAULT_LOG_FILTER: &str = "bookmarks=debug,tower_http=debug";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("PORT must be a number between 0 and 65535, got '{0}'")]
    InvalidPort(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// `PORT` - Server port number (default: 8080)
    pub port: u16,

    /// `DATABASE_URL` - Path to the redb file, or `:memory:` (default: "data.db")
    pub database_url: String,

    /// `API_TOKEN` - Bearer token for the bookmark routes; unset or empty
    /// disables authentication
    pub api_token: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            api_token: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key lookup, so tests need not touch the
    /// process environment
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        let database_url = lookup("DATABASE_URL")
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let api_token = lookup("API_TOKEN").filter(|token| !token.is_empty());

        Ok(Self {
            port,
            database_url,
            api_token,
        })
    }
}
