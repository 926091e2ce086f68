//! Question attachment download: the access-control gate, the retrieval
//! strategy chain, and the best-effort download counters.

use crate::auth::RequestUser;
use crate::error::{ErrorResponse, HttpAppError};
use crate::policy;
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, Response, StatusCode},
    response::IntoResponse,
};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use qbank_core::AppError;
use std::sync::Arc;
use uuid::Uuid;

/// Content-Disposition with an ASCII fallback name and an RFC 5987 encoded
/// full name, so quotes or non-ASCII in stored filenames cannot break the
/// header.
fn content_disposition(file_name: &str) -> String {
    let fallback: String = file_name
        .chars()
        .map(|c| {
            if c.is_ascii_graphic() && c != '"' && c != '\\' || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        fallback,
        utf8_percent_encode(file_name, NON_ALPHANUMERIC)
    )
}

#[utoipa::path(
    get,
    path = "/api/v0/questions/{id}/download",
    tag = "questions",
    params(
        ("id" = Uuid, Path, description = "Question ID")
    ),
    responses(
        (status = 200, description = "Attached file", content_type = "application/octet-stream"),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Question not verified and requester is neither owner nor admin", body = ErrorResponse),
        (status = 404, description = "Question missing, no file attached, or retrieval exhausted", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(
    skip(state, user),
    fields(
        user_id = %user.0.id,
        question_id = %id,
        operation = "download_question"
    )
)]
pub async fn download_question(
    State(state): State<Arc<AppState>>,
    user: RequestUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let RequestUser(user) = user;

    let question = state
        .questions
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Question not found".to_string()))?;

    if !question.has_file() {
        return Err(AppError::NotFound("No file attached to this question".to_string()).into());
    }

    // Policy gate comes before any storage call; a denied request never
    // reaches the provider.
    if !policy::can_download(&user, &question) {
        return Err(AppError::Forbidden(
            "This question is not verified yet. Only verified questions can be downloaded by other users."
                .to_string(),
        )
        .into());
    }

    let file = state.locator.retrieve(&question).await?;

    tracing::info!(
        username = %user.username,
        title = %question.title,
        size_bytes = file.bytes.len(),
        "Question file downloaded"
    );

    // Counters are best-effort: the bytes are already on their way, so a
    // failed increment is logged and nothing else.
    let questions = state.questions.clone();
    let users = state.users.clone();
    let question_id = question.id;
    let user_id = user.id;
    tokio::spawn(async move {
        if let Err(e) = questions.increment_downloads(question_id).await {
            tracing::warn!(error = %e, question_id = %question_id, "Failed to record question download");
        }
        if let Err(e) = users.increment_downloads(user_id).await {
            tracing::warn!(error = %e, user_id = %user_id, "Failed to record user download");
        }
    });

    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, file.content_type.as_str())
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition(&file.file_name),
        )
        .header("Access-Control-Expose-Headers", "Content-Disposition");
    if let Some(length) = file.content_length {
        builder = builder.header(header::CONTENT_LENGTH, length);
    }

    let response = builder
        .body(Body::from(file.bytes))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {}", e)))?;

    Ok(response)
}
