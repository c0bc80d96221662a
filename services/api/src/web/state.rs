//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use essay_review_core::{
    AccessGate, AggregatorSettings, BlobStore, EssayCatalog, SubmissionAggregator,
};
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub gate: AccessGate,
    pub aggregator: SubmissionAggregator,
    pub essays: Arc<EssayCatalog>,
}

impl AppState {
    /// Wires the core services from the loaded configuration.
    pub fn new(config: Arc<Config>, store: Arc<dyn BlobStore>, essays: EssayCatalog) -> Self {
        let gate = AccessGate::new(
            config.teacher_password.clone(),
            config.default_credential_policy,
        );
        let aggregator = SubmissionAggregator::new(
            store,
            AggregatorSettings {
                call_timeout: config.store_timeout,
                max_concurrent_fetches: config.store_fetch_concurrency,
            },
        );
        Self {
            config,
            gate,
            aggregator,
            essays: Arc::new(essays),
        }
    }
}
