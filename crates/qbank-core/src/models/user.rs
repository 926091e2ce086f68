use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use utoipa::ToSchema;
use uuid::Uuid;

/// User role for authorization
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Student,
    Teacher,
    Admin,
}

impl Display for UserRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            UserRole::Student => write!(f, "student"),
            UserRole::Teacher => write!(f, "teacher"),
            UserRole::Admin => write!(f, "admin"),
        }
    }
}

/// A registered user. The password hash never leaves the database layer;
/// repositories do not select it.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub course: String,
    pub semester: String,
    pub role: UserRole,
    pub uploads_count: i64,
    pub downloads_count: i64,
    pub reputation: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_display() {
        assert_eq!(UserRole::Student.to_string(), "student");
        assert_eq!(UserRole::Admin.to_string(), "admin");
    }

    #[test]
    fn test_role_serde_lowercase() {
        let json = serde_json::to_string(&UserRole::Teacher).unwrap();
        assert_eq!(json, "\"teacher\"");
        let back: UserRole = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(back, UserRole::Admin);
    }
}
