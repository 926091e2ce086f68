use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use qbank_core::models::QuestionStats;
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/v0/questions/stats/overview",
    tag = "questions",
    responses(
        (status = 200, description = "Site-wide question statistics", body = QuestionStats),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "question_stats"))]
pub async fn question_stats(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let stats = state.questions.stats().await?;
    Ok(Json(stats))
}
