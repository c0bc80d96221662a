//! crates/essay_review_core/src/aggregator.rs
//!
//! Collects every stored submission through the `BlobStore` port.
//!
//! Storage faults never escape this module: a failed listing reads as an empty
//! store and a failed key is skipped. Each skip is recorded as a `Diagnostic`
//! and logged. The only error returned to callers is a fetch task that died,
//! which means an adapter broke its own contract.

use crate::domain::{sort_newest_first, SubmissionRecord};
use crate::ports::BlobStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::timeout;
use tracing::{info, warn};

//=========================================================================================
// Settings, Outcomes and Results
//=========================================================================================

/// Tuning knobs for talking to the store.
#[derive(Debug, Clone, Copy)]
pub struct AggregatorSettings {
    /// Upper bound on a single `list_keys` or `get_json` call.
    pub call_timeout: Duration,
    /// How many `get_json` calls may be in flight at once.
    pub max_concurrent_fetches: usize,
}

impl Default for AggregatorSettings {
    fn default() -> Self {
        Self {
            call_timeout: Duration::from_secs(5),
            max_concurrent_fetches: 16,
        }
    }
}

/// What happened to a single key.
#[derive(Debug)]
pub enum FetchOutcome {
    Fetched(SubmissionRecord),
    /// The key vanished or holds `null`.
    Missing { key: String },
    Failed { key: String, reason: String },
    TimedOut { key: String },
}

/// A storage fault that was absorbed instead of reported to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    ListingFailed { reason: String },
    Missing { key: String },
    FetchFailed { key: String, reason: String },
    TimedOut { key: String },
}

/// The records that were fetched plus everything that was skipped on the way.
#[derive(Debug, Default)]
pub struct Aggregation {
    pub records: Vec<SubmissionRecord>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Aggregation {
    fn listing_failed(reason: String) -> Self {
        Self {
            records: Vec::new(),
            diagnostics: vec![Diagnostic::ListingFailed { reason }],
        }
    }

    fn absorb(&mut self, outcome: FetchOutcome) {
        let diagnostic = match outcome {
            FetchOutcome::Fetched(record) => {
                self.records.push(record);
                return;
            }
            FetchOutcome::Missing { key } => {
                warn!(key = %key, "Submission has no value; skipping");
                Diagnostic::Missing { key }
            }
            FetchOutcome::Failed { key, reason } => {
                warn!(key = %key, reason = %reason, "Failed to fetch submission; skipping");
                Diagnostic::FetchFailed { key, reason }
            }
            FetchOutcome::TimedOut { key } => {
                warn!(key = %key, "Timed out fetching submission; skipping");
                Diagnostic::TimedOut { key }
            }
        };
        self.diagnostics.push(diagnostic);
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AggregateError {
    #[error("A submission fetch task failed: {0}")]
    TaskFailed(String),
}

//=========================================================================================
// The Aggregator
//=========================================================================================

#[derive(Clone)]
pub struct SubmissionAggregator {
    store: Arc<dyn BlobStore>,
    settings: AggregatorSettings,
}

impl SubmissionAggregator {
    pub fn new(store: Arc<dyn BlobStore>, settings: AggregatorSettings) -> Self {
        Self { store, settings }
    }

    /// Lists all keys and fetches each one, in no particular order.
    pub async fn collect(&self) -> Result<Aggregation, AggregateError> {
        let call_timeout = self.settings.call_timeout;

        let keys = match timeout(call_timeout, self.store.list_keys()).await {
            Ok(Ok(keys)) => keys,
            Ok(Err(e)) => {
                warn!("Store listing failed, treating as empty: {}", e);
                return Ok(Aggregation::listing_failed(e.to_string()));
            }
            Err(_) => {
                warn!("Store listing timed out after {:?}, treating as empty", call_timeout);
                return Ok(Aggregation::listing_failed(format!(
                    "listing timed out after {:?}",
                    call_timeout
                )));
            }
        };

        let limiter = Arc::new(Semaphore::new(self.settings.max_concurrent_fetches.max(1)));
        let mut tasks = JoinSet::new();
        for key in keys {
            let store = Arc::clone(&self.store);
            let limiter = Arc::clone(&limiter);
            tasks.spawn(async move {
                // The semaphore is never closed, so acquisition only waits.
                let _permit = limiter.acquire_owned().await.ok();
                fetch_one(store.as_ref(), key, call_timeout).await
            });
        }

        let mut aggregation = Aggregation::default();
        while let Some(joined) = tasks.join_next().await {
            let outcome = joined.map_err(|e| AggregateError::TaskFailed(e.to_string()))?;
            aggregation.absorb(outcome);
        }

        info!(
            fetched = aggregation.records.len(),
            skipped = aggregation.diagnostics.len(),
            "Collected submissions"
        );
        Ok(aggregation)
    }

    /// Collects all submissions and orders them newest first.
    pub async fn retrieve(&self) -> Result<Aggregation, AggregateError> {
        let mut aggregation = self.collect().await?;
        sort_newest_first(&mut aggregation.records);
        Ok(aggregation)
    }
}

async fn fetch_one(store: &dyn BlobStore, key: String, call_timeout: Duration) -> FetchOutcome {
    let result = timeout(call_timeout, store.get_json(&key)).await;
    match result {
        Ok(Ok(Some(payload))) if payload.get().trim() != "null" => {
            FetchOutcome::Fetched(SubmissionRecord::new(key, payload))
        }
        Ok(Ok(_)) => FetchOutcome::Missing { key },
        Ok(Err(e)) => FetchOutcome::Failed {
            key,
            reason: e.to_string(),
        },
        Err(_) => FetchOutcome::TimedOut { key },
    }
}
