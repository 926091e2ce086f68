//! Domain models

mod question;
mod user;

pub use question::{Question, QuestionPage, QuestionStats, QuestionSummary};
pub use user::{User, UserRole};
