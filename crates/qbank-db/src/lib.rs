//! Database repositories for the question bank.
//!
//! Each repository owns the SQL for one domain entity and unifies errors
//! into `AppError`. Queries are runtime-checked (`sqlx::query_as`), and all
//! counter updates are single-statement `SET x = x + 1` increments so that
//! concurrent requests cannot lose updates.

pub mod db;

pub use db::questions::{QuestionFilter, QuestionRepository};
pub use db::users::UserRepository;
