//! Application state for the pricing API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::config::ConfigLoader;
use crate::engine::PricingEngine;

/// Shared application state.
///
/// Holds the pricing engine, which in turn owns the loaded configuration.
#[derive(Clone)]
pub struct AppState {
    engine: Arc<PricingEngine>,
}

impl AppState {
    /// Creates a new application state serving the given configuration.
    pub fn new(config: ConfigLoader) -> Self {
        let settings = config.settings();
        Self::from_engine(PricingEngine::new(Arc::new(config), settings))
    }

    /// Creates a new application state around an existing engine.
    pub fn from_engine(engine: PricingEngine) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }

    /// Returns a reference to the pricing engine.
    pub fn engine(&self) -> &PricingEngine {
        &self.engine
    }
}
