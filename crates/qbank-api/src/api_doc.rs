//! OpenAPI documentation.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::error::ErrorResponse;
use crate::handlers;
use qbank_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Qbank API",
        version = "0.1.0",
        description = "Question bank API (v0). Serves question listings, statistics, and authenticated file downloads with a multi-provider retrieval fallback chain. All endpoints are versioned under /api/v0/."
    ),
    paths(
        handlers::question_list::list_questions,
        handlers::question_get::get_question,
        handlers::question_stats::question_stats,
        handlers::question_download::download_question,
        handlers::question_verify::verify_question,
    ),
    components(
        schemas(
            models::Question,
            models::QuestionPage,
            models::QuestionStats,
            models::QuestionSummary,
            ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "questions", description = "Question listing, verification, and file delivery")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
