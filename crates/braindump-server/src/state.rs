//! Shared application state.

use braindump_core::ServerConfig;

/// State shared across route handlers. The pipeline itself is stateless, so
/// this only carries configuration.
pub struct AppState {
    pub config: ServerConfig,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }
}
