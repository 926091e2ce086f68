use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use qbank_core::models::Question;
use qbank_core::AppError;
use std::sync::Arc;
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/api/v0/questions/{id}",
    tag = "questions",
    params(
        ("id" = Uuid, Path, description = "Question ID")
    ),
    responses(
        (status = 200, description = "Question detail", body = Question),
        (status = 404, description = "Question not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(question_id = %id, operation = "get_question"))]
pub async fn get_question(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let question = state
        .questions
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Question not found".to_string()))?;

    // View counting is best-effort and never delays the response.
    let questions = state.questions.clone();
    let question_id = question.id;
    tokio::spawn(async move {
        if let Err(e) = questions.increment_views(question_id).await {
            tracing::warn!(error = %e, question_id = %question_id, "Failed to record question view");
        }
    });

    Ok(Json(question))
}
