//! services/api/src/web/client_config.rs
//!
//! Hands the browser client the backend-service credentials it needs.

use crate::config::ClientCredentials;
use crate::error::ApiError;
use crate::web::state::AppState;
use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Json},
};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

/// Clients may reuse the answer for an hour.
const CACHE_CONTROL: &str = "public, max-age=3600";

/// Unset optional fields are left out of the body.
#[derive(Serialize, ToSchema, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfigResponse {
    pub api_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_domain: Option<String>,
    pub project_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_bucket: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub messaging_sender_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
}

impl TryFrom<&ClientCredentials> for ClientConfigResponse {
    type Error = ApiError;

    fn try_from(creds: &ClientCredentials) -> Result<Self, Self::Error> {
        match (&creds.api_key, &creds.project_id) {
            (Some(api_key), Some(project_id)) => Ok(Self {
                api_key: api_key.clone(),
                auth_domain: creds.auth_domain.clone(),
                project_id: project_id.clone(),
                storage_bucket: creds.storage_bucket.clone(),
                messaging_sender_id: creds.messaging_sender_id.clone(),
                app_id: creds.app_id.clone(),
            }),
            _ => Err(ApiError::Unexpected {
                error: "Firebase configuration missing".to_string(),
                message: format!(
                    "Set the environment variables: {}",
                    creds.missing_mandatory().join(", ")
                ),
            }),
        }
    }
}

/// Fetch the client's service credentials.
#[utoipa::path(
    get,
    path = "/config",
    responses(
        (status = 200, description = "Client credentials", body = ClientConfigResponse),
        (status = 405, description = "Method not allowed"),
        (status = 500, description = "Mandatory credentials are not configured")
    )
)]
pub async fn client_config_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let body = ClientConfigResponse::try_from(&app_state.config.client_credentials)?;
    Ok(([(header::CACHE_CONTROL, CACHE_CONTROL)], Json(body)))
}
