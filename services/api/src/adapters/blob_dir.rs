//! services/api/src/adapters/blob_dir.rs
//!
//! A filesystem implementation of the `BlobStore` port: every submission is a
//! `<key>.json` file inside a single directory.

use async_trait::async_trait;
use essay_review_core::ports::{BlobStore, PortError, PortResult};
use serde_json::value::RawValue;
use std::io::ErrorKind;
use std::path::PathBuf;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

#[derive(Clone, Debug)]
pub struct DirBlobStore {
    root: PathBuf,
}

impl DirBlobStore {
    /// Creates a new `DirBlobStore`. The directory is not touched until first use.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> PortResult<PathBuf> {
        let is_plain = !key.is_empty()
            && key != "."
            && key != ".."
            && !key.contains(['/', '\\', '\0']);
        if !is_plain {
            return Err(PortError::Fetch {
                key: key.to_string(),
                reason: "key is not a plain file name".to_string(),
            });
        }
        Ok(self.root.join(format!("{}.json", key)))
    }
}

//=========================================================================================
// `BlobStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl BlobStore for DirBlobStore {
    async fn list_keys(&self) -> PortResult<Vec<String>> {
        let unavailable =
            |e: std::io::Error| PortError::StoreUnavailable(format!("{}: {}", self.root.display(), e));

        let mut entries = tokio::fs::read_dir(&self.root).await.map_err(unavailable)?;
        let mut keys = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(unavailable)? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                keys.push(stem.to_string());
            }
        }
        keys.sort();
        Ok(keys)
    }

    async fn get_json(&self, key: &str) -> PortResult<Option<Box<RawValue>>> {
        let path = self.path_for(key)?;
        let text = match tokio::fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(PortError::Fetch {
                    key: key.to_string(),
                    reason: e.to_string(),
                })
            }
        };
        let payload = serde_json::from_str::<Box<RawValue>>(&text).map_err(|e| PortError::Fetch {
            key: key.to_string(),
            reason: format!("invalid JSON: {}", e),
        })?;
        Ok(Some(payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[tokio::test]
    async fn lists_only_json_files_sorted() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.json"), "{}").unwrap();
        fs::write(dir.path().join("a.json"), "{}").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignore me").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();

        let store = DirBlobStore::new(dir.path());
        assert_eq!(store.list_keys().await.unwrap(), ["a", "b"]);
    }

    #[tokio::test]
    async fn missing_directory_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirBlobStore::new(dir.path().join("never-created"));
        assert!(matches!(
            store.list_keys().await,
            Err(PortError::StoreUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn returns_payload_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let json = r#"{"studentName":"Ada","score":9.50}"#;
        fs::write(dir.path().join("sub-1.json"), json).unwrap();

        let store = DirBlobStore::new(dir.path());
        let payload = store.get_json("sub-1").await.unwrap().unwrap();
        assert_eq!(payload.get(), json);
    }

    #[tokio::test]
    async fn missing_key_is_none_and_bad_json_is_a_fetch_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("broken.json"), "{ not json").unwrap();

        let store = DirBlobStore::new(dir.path());
        assert!(store.get_json("gone").await.unwrap().is_none());
        assert!(matches!(
            store.get_json("broken").await,
            Err(PortError::Fetch { key, .. }) if key == "broken"
        ));
    }

    #[tokio::test]
    async fn rejects_keys_that_escape_the_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirBlobStore::new(dir.path());
        for key in ["../secret", "a/b", "..", ""] {
            assert!(matches!(
                store.get_json(key).await,
                Err(PortError::Fetch { .. })
            ));
        }
    }
}
