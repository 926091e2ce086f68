//! Qbank Core Library
//!
//! Shared domain types for the question-bank service: the Question and User
//! models, the unified `AppError` type, and environment-driven configuration.

pub mod config;
pub mod error;
pub mod models;

pub use config::{Config, StorageConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
