//! Application state.

use std::sync::Arc;

use crate::config::ApiConfig;
use crate::registry::TaskRegistry;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub registry: Arc<TaskRegistry>,
}

impl AppState {
    /// Create new application state.
    pub fn new(config: ApiConfig) -> Self {
        Self {
            config,
            registry: Arc::new(TaskRegistry::new()),
        }
    }
}
