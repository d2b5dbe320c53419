//! Application state for the Fulfillment API service.

use std::sync::Arc;

use storefront_db::DbPool;
use storefront_fulfillment_core::FulfillmentService;

use crate::config::Config;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Fulfillment service (verify, classify, write)
    pub fulfillment: Arc<FulfillmentService>,
    /// Database pool (readiness probe)
    pub pool: DbPool,
    /// Configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Create new application state
    pub fn new(fulfillment: FulfillmentService, pool: DbPool, config: Config) -> Self {
        Self {
            fulfillment: Arc::new(fulfillment),
            pool,
            config: Arc::new(config),
        }
    }

    /// Get request timeout from config
    pub fn request_timeout(&self) -> std::time::Duration {
        self.config.request_timeout
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &"<config>")
            .finish_non_exhaustive()
    }
}
