//! Download access policy.
//!
//! Unverified questions are only downloadable by their uploader and admins;
//! verification opens a question to everyone. Evaluated before any storage
//! call, so a denied request never costs provider quota.

use qbank_core::models::{Question, User};

/// First match wins: owner, admin, then verified. No side effects.
pub fn can_download(requester: &User, question: &Question) -> bool {
    if question.uploaded_by == requester.id {
        return true;
    }
    if requester.is_admin() {
        return true;
    }
    question.is_verified
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use qbank_core::models::UserRole;
    use uuid::Uuid;

    fn user(role: UserRole) -> User {
        User {
            id: Uuid::new_v4(),
            username: "rina".to_string(),
            email: "rina@example.edu".to_string(),
            first_name: "Rina".to_string(),
            last_name: "Das".to_string(),
            course: "CS".to_string(),
            semester: "4th".to_string(),
            role,
            uploads_count: 0,
            downloads_count: 0,
            reputation: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn question(uploaded_by: Uuid, is_verified: bool) -> Question {
        Question {
            id: Uuid::new_v4(),
            title: "Quiz 1".to_string(),
            subject: "Networks".to_string(),
            course: "CS".to_string(),
            year: 2024,
            semester: "4th".to_string(),
            question_type: "Short Answer".to_string(),
            difficulty: "Hard".to_string(),
            content: "Explain TCP slow start.".to_string(),
            solution: String::new(),
            tags: vec![],
            file_url: "https://res.example.com/v1/q.pdf".to_string(),
            file_name: "q.pdf".to_string(),
            storage_object_id: "question-bank/q".to_string(),
            uploaded_by,
            downloads: 0,
            views: 0,
            is_verified,
            verified_by: is_verified.then(Uuid::new_v4),
            verified_at: is_verified.then(Utc::now),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    /// Exhaustive truth table over {is_owner, is_admin, is_verified}:
    /// allowed iff any of the three holds.
    #[test]
    fn test_policy_truth_table() {
        for is_owner in [false, true] {
            for is_admin in [false, true] {
                for is_verified in [false, true] {
                    let requester = user(if is_admin {
                        UserRole::Admin
                    } else {
                        UserRole::Student
                    });
                    let uploader = if is_owner { requester.id } else { Uuid::new_v4() };
                    let question = question(uploader, is_verified);

                    let expected = is_owner || is_admin || is_verified;
                    assert_eq!(
                        can_download(&requester, &question),
                        expected,
                        "owner={} admin={} verified={}",
                        is_owner,
                        is_admin,
                        is_verified
                    );
                }
            }
        }
    }

    #[test]
    fn test_teacher_role_is_not_privileged() {
        let requester = user(UserRole::Teacher);
        let unverified = question(Uuid::new_v4(), false);
        assert!(!can_download(&requester, &unverified));
    }
}
