//! services/docvault/src/workflows/state.rs
//!
//! Defines the application's shared state, built once at startup and handed
//! to every workflow.

use crate::adapters::HttpDocumentApi;
use crate::config::Config;
use crate::error::AppError;
use docvault_core::ports::{Confirm, DocumentApi};
use std::sync::Arc;

/// The shared application state. Workflows take their collaborators from
/// here instead of reaching for a global client.
#[derive(Clone)]
pub struct AppState {
    pub api: Arc<dyn DocumentApi>,
    pub confirm: Arc<dyn Confirm>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(api: Arc<dyn DocumentApi>, confirm: Arc<dyn Confirm>, config: Arc<Config>) -> Self {
        Self {
            api,
            confirm,
            config,
        }
    }

    /// Wires the HTTP adapter for the configured backend.
    pub fn connect(config: Config, confirm: Arc<dyn Confirm>) -> Result<Self, AppError> {
        let api = HttpDocumentApi::from_config(&config)?;
        Ok(Self::new(Arc::new(api), confirm, Arc::new(config)))
    }
}
