use crate::auth::RequestUser;
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
    patch,
    path = "/api/v0/questions/{id}/verify",
    tag = "questions",
    params(
        ("id" = Uuid, Path, description = "Question ID")
    ),
    responses(
        (status = 200, description = "Question verified", body = Question),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Requester is not an admin", body = ErrorResponse),
        (status = 404, description = "Question not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(
    skip(state, user),
    fields(
        user_id = %user.0.id,
        question_id = %id,
        operation = "verify_question"
    )
)]
pub async fn verify_question(
    State(state): State<Arc<AppState>>,
    user: RequestUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let RequestUser(user) = user;

    if !user.is_admin() {
        return Err(AppError::Forbidden(
            "Access denied. Admin privileges required.".to_string(),
        )
        .into());
    }

    let question = state
        .questions
        .verify(id, user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Question not found".to_string()))?;

    tracing::info!(
        admin = %user.username,
        title = %question.title,
        "Question verified"
    );

    Ok(Json(question))
}
