use qbank_core::models::User;
use qbank_core::AppError;
use sqlx::PgPool;
use uuid::Uuid;

/// Columns selected for user rows. The password hash stays in the database;
/// no repository method reads it.
const USER_COLUMNS: &str = "id, username, email, first_name, last_name, course, semester, role, \
     uploads_count, downloads_count, reputation, created_at, updated_at";

/// User repository
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Atomic download-counter increment; safe under concurrent requests.
    pub async fn increment_downloads(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET downloads_count = downloads_count + 1 WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
