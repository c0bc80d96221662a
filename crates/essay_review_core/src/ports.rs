//! crates/essay_review_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of the concrete key-value store that holds submissions.

use async_trait::async_trait;
use serde_json::value::RawValue;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., filesystem, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    /// The store could not produce a key listing (not initialised, unreachable).
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
    /// A single key could not be read or decoded.
    #[error("Failed to fetch '{key}': {reason}")]
    Fetch { key: String, reason: String },
    #[error("Unauthorized")]
    Unauthorized,
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// A durable key-value store holding one JSON document per submission.
///
/// Both operations are read-only and idempotent, so callers may retry them or
/// run them concurrently.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Lists every key currently held by the store.
    async fn list_keys(&self) -> PortResult<Vec<String>>;

    /// Fetches the JSON document stored under `key`, exactly as stored.
    ///
    /// Returns `Ok(None)` when the key no longer exists.
    async fn get_json(&self, key: &str) -> PortResult<Option<Box<RawValue>>>;
}
