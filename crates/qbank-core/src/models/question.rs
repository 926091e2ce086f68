use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A previous-year exam question with an optional attached file.
///
/// `file_url` and `storage_object_id` are both empty strings when no file is
/// attached; `storage_object_id` is the provider-assigned public id used for
/// signed-URL generation. `is_verified` is false at creation and only ever
/// transitions to true via an admin verification, which also sets
/// `verified_by` and `verified_at`.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Question {
    pub id: Uuid,
    pub title: String,
    pub subject: String,
    pub course: String,
    pub year: i32,
    pub semester: String,
    pub question_type: String,
    pub difficulty: String,
    pub content: String,
    pub solution: String,
    pub tags: Vec<String>,
    pub file_url: String,
    pub file_name: String,
    pub storage_object_id: String,
    pub uploaded_by: Uuid,
    pub downloads: i64,
    pub views: i64,
    pub is_verified: bool,
    pub verified_by: Option<Uuid>,
    pub verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Question {
    /// Whether a file is attached. Questions without one must never be
    /// offered for download.
    pub fn has_file(&self) -> bool {
        !self.file_url.is_empty()
    }
}

/// Paginated question listing envelope
#[derive(Debug, Serialize, ToSchema)]
pub struct QuestionPage {
    pub questions: Vec<Question>,
    pub total_pages: i64,
    pub current_page: i64,
    pub total: i64,
}

/// Aggregate counts grouped by a dimension (subject, course)
#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
pub struct QuestionSummary {
    pub name: String,
    pub count: i64,
}

/// Site-wide question statistics
#[derive(Debug, Serialize, ToSchema)]
pub struct QuestionStats {
    pub total_questions: i64,
    pub verified_questions: i64,
    pub total_downloads: i64,
    pub total_views: i64,
    pub top_subjects: Vec<QuestionSummary>,
    pub top_courses: Vec<QuestionSummary>,
}
