//! Server configuration.

use serde::{Deserialize, Serialize};

use crate::options::DEFAULT_TIMEZONE;

/// Top-level Braindump server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server port.
    pub port: u16,
    /// Zone applied to requests that carry no timezone.
    pub default_timezone: String,
}

impl ServerConfig {
    /// Create configuration from environment and defaults.
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3009);
        let default_timezone =
            std::env::var("BRAINDUMP_TZ").unwrap_or_else(|_| DEFAULT_TIMEZONE.to_string());

        Self {
            port,
            default_timezone,
        }
    }
}
