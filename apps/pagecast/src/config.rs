//! # Server Configuration
//!
//! Settings for the HTTP/WebSocket server.
//!
//! Resolution order, lowest to highest precedence:
//! 1. Built-in defaults
//! 2. Optional TOML file (`--config pagecast.toml`)
//! 3. Environment variables
//! 4. CLI flags (`--host`, `--port`)
//!
//! ## Environment Variables
//!
//! - `PAGECAST_HOST`: Bind address
//! - `PAGECAST_PORT`: Bind port
//! - `PAGECAST_CORS_ORIGINS`: Comma-separated list of allowed origins, or "*" for all (default: localhost only)
//! - `PAGECAST_RATE_LIMIT`: Requests per second (default: 100, 0 to disable)
//! - `PAGECAST_BODY_LIMIT`: Maximum request body in bytes (default: 10 MiB)

use pagecast_core::PagecastError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default request rate: 100 requests per second.
pub const DEFAULT_RATE_LIMIT: u32 = 100;

/// Default request body limit: 10 MiB.
pub const DEFAULT_BODY_LIMIT: usize = 10 * 1024 * 1024;

/// Server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Raw CORS setting: `"*"`, a comma-separated origin list, or unset for
    /// localhost only.
    pub cors_origins: Option<String>,
    /// Requests per second; 0 disables limiting.
    pub rate_limit: u32,
    pub body_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            cors_origins: None,
            rate_limit: DEFAULT_RATE_LIMIT,
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }
}

impl ServerConfig {
    /// Load from an optional TOML file, then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, PagecastError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Parse a TOML file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, PagecastError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            PagecastError::IoError(format!("Cannot read config '{}': {}", path.display(), e))
        })?;
        Self::from_toml(&text)
    }

    /// Parse TOML text.
    pub fn from_toml(text: &str) -> Result<Self, PagecastError> {
        toml::from_str(text)
            .map_err(|e| PagecastError::SerializationError(format!("Invalid config: {}", e)))
    }

    /// Apply `PAGECAST_*` overrides using `lookup` to read variables.
    ///
    /// Unparseable numeric values are ignored with a warning.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("PAGECAST_HOST") {
            self.host = host;
        }
        if let Some(port) = parse_var(&lookup, "PAGECAST_PORT") {
            self.port = port;
        }
        if let Some(origins) = lookup("PAGECAST_CORS_ORIGINS") {
            self.cors_origins = Some(origins);
        }
        if let Some(rate) = parse_var(&lookup, "PAGECAST_RATE_LIMIT") {
            self.rate_limit = rate;
        }
        if let Some(limit) = parse_var(&lookup, "PAGECAST_BODY_LIMIT") {
            self.body_limit = limit;
        }
    }

    /// `host:port` for binding.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring invalid {}={:?}", key, raw);
            None
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
