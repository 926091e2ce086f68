//! Route configuration and setup

use crate::auth::{auth_middleware, AuthState};
use crate::handlers;
use crate::state::AppState;
use axum::{
    http::{HeaderValue, Method},
    response::IntoResponse,
    routing::{get, patch},
    Json, Router,
};
use qbank_core::Config;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router, anyhow::Error> {
    let cors = setup_cors(config)?;
    let auth_state = Arc::new(AuthState {
        jwt_secret: config.jwt_secret.clone(),
        users: state.users.clone(),
    });

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/api/openapi.json", get(openapi_spec))
        .route(
            "/api/v0/questions",
            get(handlers::question_list::list_questions),
        )
        .route(
            "/api/v0/questions/stats/overview",
            get(handlers::question_stats::question_stats),
        )
        .route(
            "/api/v0/questions/{id}",
            get(handlers::question_get::get_question),
        );

    // Protected routes (require authentication)
    let protected_routes = Router::new()
        .route(
            "/api/v0/questions/{id}/download",
            get(handlers::question_download::download_question),
        )
        .route(
            "/api/v0/questions/{id}/verify",
            patch(handlers::question_verify::verify_question),
        )
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            auth_middleware,
        ));

    let app = public_routes
        .merge(protected_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.cors_origins.contains(&"*".to_string()) {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::PATCH, Method::OPTIONS])
            .allow_headers(Any)
    } else {
        let origins: Result<Vec<HeaderValue>, _> =
            config.cors_origins.iter().map(|o| o.parse()).collect();

        CorsLayer::new()
            .allow_origin(origins.unwrap_or_default())
            .allow_methods([Method::GET, Method::PATCH, Method::OPTIONS])
            .allow_headers(Any)
    };
    Ok(cors)
}

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

async fn openapi_spec() -> impl IntoResponse {
    Json(crate::api_doc::ApiDoc::openapi())
}
