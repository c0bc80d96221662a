//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{load_catalog, DirBlobStore, MemoryBlobStore},
    config::{Config, StoreBackend},
    error::ApiError,
    web::{app, state::AppState},
};
use essay_review_core::{BlobStore, DefaultCredentialPolicy};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Open the Submission Store ---
    let store: Arc<dyn BlobStore> = match &config.store_backend {
        StoreBackend::Directory(path) => {
            info!("Reading submissions from {}", path.display());
            Arc::new(DirBlobStore::new(path.clone()))
        }
        StoreBackend::Memory(seed) => {
            let store = match MemoryBlobStore::snapshot_of(&DirBlobStore::new(seed.clone())).await {
                Ok(store) => store,
                Err(e) => {
                    warn!("No snapshot loaded, the in-memory store starts empty: {}", e);
                    MemoryBlobStore::default()
                }
            };
            warn!("Using the in-memory submission store; nothing persists across restarts.");
            Arc::new(store)
        }
    };

    // --- 3. Load Essay Definitions ---
    info!("Loading essay definitions from {}...", config.essays_path.display());
    let essays = load_catalog(&config.essays_path).await?;
    info!("Loaded {} essay definition(s).", essays.len());

    if config.default_credential_policy == DefaultCredentialPolicy::AlwaysAccept {
        warn!("The default teacher password is accepted alongside TEACHER_PASSWORD; set ACCEPT_DEFAULT_PASSWORD=false to refuse it.");
    }
    let missing = config.client_credentials.missing_mandatory();
    if !missing.is_empty() {
        warn!("GET /config will fail until these are set: {}", missing.join(", "));
    }

    // --- 4. Build the Shared AppState and Router ---
    let app_state = Arc::new(AppState::new(config.clone(), store, essays));
    let router = app(app_state);

    // --- 5. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
