//! Application state.

use std::sync::Arc;

use inventory_engine::Inventory;
use inventory_store::Store;

use crate::config::ServiceConfig;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The accounting engine over the configured store.
    pub inventory: Arc<Inventory<dyn Store>>,

    /// Service configuration.
    pub config: ServiceConfig,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(store: Arc<dyn Store>, config: ServiceConfig) -> Self {
        Self {
            inventory: Arc::new(Inventory::new(store)),
            config,
        }
    }
}
