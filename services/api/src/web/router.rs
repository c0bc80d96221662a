//! services/api/src/web/router.rs
//!
//! Builds the complete HTTP application.

use crate::web::{
    client_config::client_config_handler,
    essays::{get_essay_handler, list_essays_handler},
    middleware::require_reviewer,
    rest::{
        health_handler, list_submissions_handler, method_not_allowed_handler, not_found_handler,
        submissions_preflight_handler, ApiDoc,
    },
    state::AppState,
};
use axum::{
    handler::Handler,
    http::{header, HeaderValue},
    middleware as axum_middleware,
    routing::{get, MethodRouter},
    Router,
};
use std::sync::Arc;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// A route answering `GET` only; every other method, `HEAD` included, gets 405.
fn get_only<H, T>(handler: H) -> MethodRouter<Arc<AppState>>
where
    H: Handler<T, Arc<AppState>>,
    T: 'static,
{
    // HEAD would otherwise be answered by the GET handler.
    get(handler)
        .head(method_not_allowed_handler)
        .fallback(method_not_allowed_handler)
}

/// Assembles every route, the Swagger UI and the cross-cutting layers.
pub fn app(app_state: Arc<AppState>) -> Router {
    let submissions = get_only(list_submissions_handler)
        .options(submissions_preflight_handler)
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_reviewer,
        ));

    let api_router = Router::new()
        .route("/submissions", submissions)
        .route("/config", get_only(client_config_handler))
        .route("/essays", get_only(list_essays_handler))
        .route("/essays/{id}", get_only(get_essay_handler))
        .route("/health", get_only(health_handler))
        .fallback(not_found_handler)
        .with_state(app_state);

    Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(TraceLayer::new_for_http())
}
