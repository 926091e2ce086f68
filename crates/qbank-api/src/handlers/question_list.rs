use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use qbank_core::models::QuestionPage;
use qbank_db::QuestionFilter;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;
use uuid::Uuid;

const DEFAULT_PAGE_SIZE: i64 = 10;
const MAX_PAGE_SIZE: i64 = 100;

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    DEFAULT_PAGE_SIZE
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListParams {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
    pub subject: Option<String>,
    pub course: Option<String>,
    pub year: Option<i32>,
    pub semester: Option<String>,
    pub question_type: Option<String>,
    pub difficulty: Option<String>,
    pub verified: Option<bool>,
    pub uploaded_by: Option<Uuid>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    /// "asc" or "desc"; anything else means descending
    pub sort_order: Option<String>,
}

impl From<ListParams> for QuestionFilter {
    fn from(params: ListParams) -> Self {
        QuestionFilter {
            subject: params.subject,
            course: params.course,
            year: params.year,
            semester: params.semester,
            question_type: params.question_type,
            difficulty: params.difficulty,
            verified: params.verified,
            uploaded_by: params.uploaded_by,
            search: params.search,
            sort_by: params.sort_by,
            sort_desc: params.sort_order.as_deref() != Some("asc"),
            page: params.page.max(1),
            limit: params.limit.clamp(1, MAX_PAGE_SIZE),
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v0/questions",
    tag = "questions",
    params(ListParams),
    responses(
        (status = 200, description = "Paginated question listing", body = QuestionPage),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "list_questions"))]
pub async fn list_questions(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, HttpAppError> {
    let filter = QuestionFilter::from(params);
    let (questions, total) = state.questions.list(&filter).await?;

    Ok(Json(QuestionPage {
        total_pages: (total + filter.limit - 1) / filter.limit,
        current_page: filter.page,
        total,
        questions,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> ListParams {
        ListParams {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
            subject: None,
            course: None,
            year: None,
            semester: None,
            question_type: None,
            difficulty: None,
            verified: None,
            uploaded_by: None,
            search: None,
            sort_by: None,
            sort_order: None,
        }
    }

    #[test]
    fn test_limit_clamped() {
        let mut p = params();
        p.limit = 10_000;
        let filter = QuestionFilter::from(p);
        assert_eq!(filter.limit, MAX_PAGE_SIZE);

        let mut p = params();
        p.limit = 0;
        let filter = QuestionFilter::from(p);
        assert_eq!(filter.limit, 1);
    }

    #[test]
    fn test_sort_order_defaults_to_descending() {
        let filter = QuestionFilter::from(params());
        assert!(filter.sort_desc);

        let mut p = params();
        p.sort_order = Some("asc".to_string());
        assert!(!QuestionFilter::from(p).sort_desc);
    }
}
