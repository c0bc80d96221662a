//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the submission review endpoints and the master
//! definition for the OpenAPI specification.

use crate::error::ApiError;
use crate::web::client_config::{self, ClientConfigResponse};
use crate::web::essays::{self, EssaySummary};
use crate::web::state::AppState;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json},
};
use essay_review_core::SubmissionRecord;
use serde::Serialize;
use serde_json::value::RawValue;
use std::sync::Arc;
use tracing::info;
use utoipa::{OpenApi, ToSchema};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        list_submissions_handler,
        submissions_preflight_handler,
        health_handler,
        client_config::client_config_handler,
        essays::list_essays_handler,
        essays::get_essay_handler,
    ),
    components(
        schemas(SubmissionsResponse, ErrorBody, HealthResponse, ClientConfigResponse, EssaySummary)
    ),
    tags(
        (name = "Essay Review API", description = "Submission review and essay content for the guided essay writer.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response Structs
//=========================================================================================

/// All stored submissions, newest first.
#[derive(Serialize, ToSchema)]
pub struct SubmissionsResponse {
    success: bool,
    count: usize,
    /// Each submission exactly as it was stored.
    #[schema(value_type = Vec<Object>)]
    submissions: Vec<Box<RawValue>>,
}

/// The envelope every failed request is answered with.
#[derive(Serialize, ToSchema)]
pub struct ErrorBody {
    error: String,
    /// Present on 500 responses.
    message: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    status: String,
}

//=========================================================================================
// Handlers
//=========================================================================================

/// List every stored submission.
///
/// Storage faults never fail this request: an unreachable store reads as empty
/// and unreadable submissions are left out.
#[utoipa::path(
    get,
    path = "/submissions",
    params(
        ("auth" = Option<String>, Query, description = "The teacher password.")
    ),
    responses(
        (status = 200, description = "Submissions, newest first", body = SubmissionsResponse),
        (status = 401, description = "Missing or wrong password", body = ErrorBody),
        (status = 405, description = "Method not allowed", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn list_submissions_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<SubmissionsResponse>, ApiError> {
    let aggregation = app_state.aggregator.retrieve().await?;

    let submissions: Vec<Box<RawValue>> = aggregation
        .records
        .into_iter()
        .map(SubmissionRecord::into_payload)
        .collect();
    info!(
        count = submissions.len(),
        skipped = aggregation.diagnostics.len(),
        "Serving submissions"
    );

    Ok(Json(SubmissionsResponse {
        success: true,
        count: submissions.len(),
        submissions,
    }))
}

/// CORS preflight for `/submissions`.
#[utoipa::path(
    options,
    path = "/submissions",
    responses(
        (status = 204, description = "Preflight acknowledged")
    )
)]
pub async fn submissions_preflight_handler() -> impl IntoResponse {
    (
        StatusCode::NO_CONTENT,
        [
            (header::ACCESS_CONTROL_ALLOW_METHODS, "GET, OPTIONS"),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type, Authorization"),
        ],
    )
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Method fallback shared by every route.
pub async fn method_not_allowed_handler() -> ApiError {
    ApiError::MethodNotAllowed
}

/// Router fallback for unknown paths.
pub async fn not_found_handler() -> ApiError {
    ApiError::NotFound("Not found".to_string())
}
