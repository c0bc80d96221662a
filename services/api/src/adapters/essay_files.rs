//! services/api/src/adapters/essay_files.rs
//!
//! Loads essay definitions from a directory of `*.json` files at startup.

use crate::error::ApiError;
use essay_review_core::essay::{EssayCatalog, EssayDefinition};
use std::path::Path;
use tracing::{debug, warn};

/// Reads and validates every essay definition under `dir`.
///
/// A missing directory yields an empty catalog; a malformed or invalid file
/// is an error so that bad content never reaches the writing UI.
pub async fn load_catalog(dir: &Path) -> Result<EssayCatalog, ApiError> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!("Essay directory {} does not exist; serving no essays", dir.display());
            return Ok(EssayCatalog::default());
        }
        Err(e) => return Err(e.into()),
    };

    let mut paths = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) == Some("json") {
            paths.push(path);
        }
    }
    paths.sort();

    let mut definitions = Vec::with_capacity(paths.len());
    for path in paths {
        let text = tokio::fs::read_to_string(&path).await?;
        let definition: EssayDefinition = serde_json::from_str(&text)
            .map_err(|source| ApiError::EssayFile { path: path.clone(), source })?;
        debug!("Loaded essay '{}' from {}", definition.id, path.display());
        definitions.push(definition);
    }

    Ok(EssayCatalog::new(definitions)?)
}
