//! services/api/src/web/middleware.rs
//!
//! Access control middleware for the submissions route.

use axum::{
    extract::{Query, Request, State},
    http::{header, Method},
    middleware::Next,
    response::Response,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::warn;

use crate::error::ApiError;
use crate::web::state::AppState;

#[derive(Deserialize)]
struct AuthParams {
    auth: Option<String>,
}

/// Middleware that checks the teacher credential before a `GET` reaches the handler.
///
/// Other methods pass straight through so the route can answer the preflight
/// or reject the method without consulting the gate.
/// The credential is read from the `auth` query parameter, falling back to
/// an `Authorization: Bearer` header.
pub async fn require_reviewer(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if req.method() != Method::GET {
        return Ok(next.run(req).await);
    }

    let credential = credential_from(&req);
    state.gate.authorize(credential.as_deref()).map_err(|e| {
        warn!("Rejected submissions request: {}", e);
        ApiError::from(e)
    })?;

    Ok(next.run(req).await)
}

fn credential_from(req: &Request) -> Option<String> {
    let from_query = Query::<AuthParams>::try_from_uri(req.uri())
        .ok()
        .and_then(|Query(params)| params.auth);

    from_query.or_else(|| {
        req.headers()
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(|token| token.trim().to_string())
    })
}
