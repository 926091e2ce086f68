use qbank_core::models::{Question, QuestionStats, QuestionSummary};
use qbank_core::AppError;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

const QUESTION_COLUMNS: &str = "id, title, subject, course, year, semester, question_type, \
     difficulty, content, solution, tags, file_url, file_name, storage_object_id, uploaded_by, \
     downloads, views, is_verified, verified_by, verified_at, created_at, updated_at";

/// Sort columns accepted from clients. Anything else falls back to
/// created_at so the column name never comes from user input.
const SORTABLE_COLUMNS: &[&str] = &["created_at", "downloads", "views", "year", "title"];

/// Listing filters; all optional and combined with AND.
#[derive(Debug, Default, Clone)]
pub struct QuestionFilter {
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
    pub sort_desc: bool,
    pub page: i64,
    pub limit: i64,
}

impl QuestionFilter {
    pub fn sort_column(&self) -> &str {
        match self.sort_by.as_deref() {
            Some(col) if SORTABLE_COLUMNS.contains(&col) => col,
            _ => "created_at",
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page.max(1) - 1) * self.limit.max(1)
    }
}

/// Question repository
#[derive(Clone)]
pub struct QuestionRepository {
    pool: PgPool,
}

impl QuestionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Question>, AppError> {
        let question = sqlx::query_as::<_, Question>(&format!(
            "SELECT {} FROM questions WHERE id = $1",
            QUESTION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(question)
    }

    fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &QuestionFilter) {
        if let Some(subject) = &filter.subject {
            builder
                .push(" AND subject ILIKE ")
                .push_bind(format!("%{}%", subject));
        }
        if let Some(course) = &filter.course {
            builder
                .push(" AND course ILIKE ")
                .push_bind(format!("%{}%", course));
        }
        if let Some(year) = filter.year {
            builder.push(" AND year = ").push_bind(year);
        }
        if let Some(semester) = &filter.semester {
            builder.push(" AND semester = ").push_bind(semester.clone());
        }
        if let Some(question_type) = &filter.question_type {
            builder
                .push(" AND question_type = ")
                .push_bind(question_type.clone());
        }
        if let Some(difficulty) = &filter.difficulty {
            builder
                .push(" AND difficulty = ")
                .push_bind(difficulty.clone());
        }
        if let Some(verified) = filter.verified {
            builder.push(" AND is_verified = ").push_bind(verified);
        }
        if let Some(uploaded_by) = filter.uploaded_by {
            builder.push(" AND uploaded_by = ").push_bind(uploaded_by);
        }
        if let Some(search) = &filter.search {
            let pattern = format!("%{}%", search);
            builder
                .push(" AND (title ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR content ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR EXISTS (SELECT 1 FROM unnest(tags) AS tag WHERE tag ILIKE ")
                .push_bind(pattern)
                .push("))");
        }
    }

    /// List questions matching the filter, newest first by default.
    /// Returns the page of rows and the total match count.
    pub async fn list(&self, filter: &QuestionFilter) -> Result<(Vec<Question>, i64), AppError> {
        let mut builder = QueryBuilder::<Postgres>::new(format!(
            "SELECT {} FROM questions WHERE TRUE",
            QUESTION_COLUMNS
        ));
        Self::push_filters(&mut builder, filter);
        builder.push(format!(
            " ORDER BY {} {}",
            filter.sort_column(),
            if filter.sort_desc { "DESC" } else { "ASC" }
        ));
        builder
            .push(" LIMIT ")
            .push_bind(filter.limit.max(1))
            .push(" OFFSET ")
            .push_bind(filter.offset());

        let questions = builder
            .build_query_as::<Question>()
            .fetch_all(&self.pool)
            .await?;

        let mut count_builder =
            QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM questions WHERE TRUE");
        Self::push_filters(&mut count_builder, filter);
        let total: i64 = count_builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        Ok((questions, total))
    }

    /// Mark a question verified. Verification is monotonic: verified_by and
    /// verified_at are set together with the flag and never cleared here.
    pub async fn verify(&self, id: Uuid, admin_id: Uuid) -> Result<Option<Question>, AppError> {
        let question = sqlx::query_as::<_, Question>(&format!(
            r#"
            UPDATE questions
            SET is_verified = TRUE, verified_by = $2, verified_at = NOW(), updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            QUESTION_COLUMNS
        ))
        .bind(id)
        .bind(admin_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(question)
    }

    /// Atomic view-counter increment; safe under concurrent requests.
    pub async fn increment_views(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("UPDATE questions SET views = views + 1 WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Atomic download-counter increment; safe under concurrent requests.
    pub async fn increment_downloads(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("UPDATE questions SET downloads = downloads + 1 WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Site-wide totals plus the ten most common subjects and courses.
    pub async fn stats(&self) -> Result<QuestionStats, AppError> {
        let (total_questions, verified_questions, total_downloads, total_views): (
            i64,
            i64,
            i64,
            i64,
        ) = sqlx::query_as(
            r#"
            SELECT COUNT(*),
                   COUNT(*) FILTER (WHERE is_verified),
                   COALESCE(SUM(downloads), 0)::BIGINT,
                   COALESCE(SUM(views), 0)::BIGINT
            FROM questions
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        let top_subjects = sqlx::query_as::<_, QuestionSummary>(
            r#"
            SELECT subject AS name, COUNT(*) AS count
            FROM questions
            GROUP BY subject
            ORDER BY count DESC
            LIMIT 10
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let top_courses = sqlx::query_as::<_, QuestionSummary>(
            r#"
            SELECT course AS name, COUNT(*) AS count
            FROM questions
            GROUP BY course
            ORDER BY count DESC
            LIMIT 10
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(QuestionStats {
            total_questions,
            verified_questions,
            total_downloads,
            total_views,
            top_subjects,
            top_courses,
        })
    }
}
