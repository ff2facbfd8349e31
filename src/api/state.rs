//! Application state for the agent payroll API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::config::ConfigLoader;
use crate::store::RecordStore;

/// Shared application state.
///
/// Holds the loaded configuration and the record store. Both are behind
/// `Arc`, so cloning the state per request is cheap.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ConfigLoader>,
    store: Arc<dyn RecordStore>,
}

impl AppState {
    /// Creates a new application state from a configuration and a store.
    pub fn new(config: ConfigLoader, store: impl RecordStore + 'static) -> Self {
        Self::with_shared_store(config, Arc::new(store))
    }

    /// Creates a new application state around an already shared store.
    pub fn with_shared_store(config: ConfigLoader, store: Arc<dyn RecordStore>) -> Self {
        Self {
            config: Arc::new(config),
            store,
        }
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Returns the record store.
    pub fn store(&self) -> &dyn RecordStore {
        self.store.as_ref()
    }
}
