//! services/api/src/web/essays.rs
//!
//! Serves the essay definitions to the writing UI.

use crate::error::ApiError;
use crate::web::state::AppState;
use axum::{
    extract::{Path, State},
    response::Json,
};
use essay_review_core::EssayDefinition;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EssaySummary {
    id: String,
    title: String,
    subject: String,
    year_group: String,
    paragraph_count: usize,
    total_points: u32,
}

impl From<&EssayDefinition> for EssaySummary {
    fn from(essay: &EssayDefinition) -> Self {
        Self {
            id: essay.id.clone(),
            title: essay.title.clone(),
            subject: essay.subject.clone(),
            year_group: essay.year_group.clone(),
            paragraph_count: essay.paragraphs.len(),
            total_points: essay.total_points(),
        }
    }
}

/// List the available essays.
#[utoipa::path(
    get,
    path = "/essays",
    responses(
        (status = 200, description = "Essay summaries", body = Vec<EssaySummary>)
    )
)]
pub async fn list_essays_handler(State(app_state): State<Arc<AppState>>) -> Json<Vec<EssaySummary>> {
    Json(app_state.essays.iter().map(EssaySummary::from).collect())
}

/// Fetch one essay with its paragraphs and grading criteria.
#[utoipa::path(
    get,
    path = "/essays/{id}",
    params(
        ("id" = String, Path, description = "Essay id")
    ),
    responses(
        (status = 200, description = "The full essay definition", body = Object),
        (status = 404, description = "No essay with that id")
    )
)]
pub async fn get_essay_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<EssayDefinition>, ApiError> {
    app_state
        .essays
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Essay '{}' not found", id)))
}
