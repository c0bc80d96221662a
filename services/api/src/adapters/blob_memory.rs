//! services/api/src/adapters/blob_memory.rs
//!
//! An in-process implementation of the `BlobStore` port.

use async_trait::async_trait;
use essay_review_core::ports::{BlobStore, PortResult};
use serde_json::value::RawValue;
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use tracing::warn;

#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: RwLock<BTreeMap<String, Box<RawValue>>>,
}

impl MemoryBlobStore {
    /// Copies every readable document out of `source`.
    ///
    /// Keys that vanish or fail to read are skipped; only a failed listing
    /// is an error.
    pub async fn snapshot_of(source: &dyn BlobStore) -> PortResult<Self> {
        let mut blobs = BTreeMap::new();
        for key in source.list_keys().await? {
            match source.get_json(&key).await {
                Ok(Some(payload)) => {
                    blobs.insert(key, payload);
                }
                Ok(None) => {}
                Err(e) => warn!("Leaving '{}' out of the snapshot: {}", key, e),
            }
        }
        Ok(Self {
            blobs: RwLock::new(blobs),
        })
    }

    /// Stores `json` under `key`, replacing any previous value.
    pub async fn insert(&self, key: impl Into<String>, json: &str) -> Result<(), serde_json::Error> {
        let payload = RawValue::from_string(json.to_string())?;
        self.blobs.write().await.insert(key.into(), payload);
        Ok(())
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn list_keys(&self) -> PortResult<Vec<String>> {
        Ok(self.blobs.read().await.keys().cloned().collect())
    }

    async fn get_json(&self, key: &str) -> PortResult<Option<Box<RawValue>>> {
        Ok(self.blobs.read().await.get(key).cloned())
    }
}
