//! HTTP error response conversion
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>`. Domain errors
//! (`AppError`, `LocatorError`) convert into `HttpAppError` so they render
//! consistently: status from `ErrorMetadata`, JSON body, leveled logging.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use qbank_core::{AppError, ErrorMetadata, LogLevel};
use qbank_storage::LocatorError;
use serde::Serialize;
use std::sync::OnceLock;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Whether this error is recoverable (can be retried)
    pub recoverable: bool,
}

/// Wrapper type for AppError to implement IntoResponse
/// (orphan rules: IntoResponse is external, AppError lives in qbank-core)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        })
    }
}

impl From<LocatorError> for HttpAppError {
    fn from(err: LocatorError) -> Self {
        let app = match err {
            LocatorError::NoFile => {
                AppError::NotFound("No file attached to this question".to_string())
            }
            LocatorError::Exhausted => AppError::RetrievalExhausted(
                "File could not be retrieved from storage".to_string(),
            ),
            LocatorError::InvalidFileName(name) => {
                AppError::InvalidInput(format!("Invalid file name: {}", name))
            }
            LocatorError::LocalRead(msg) | LocatorError::Client(msg) => AppError::Internal(msg),
        };
        HttpAppError(app)
    }
}

fn log_error(error: &AppError) {
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, code = error.error_code(), "Request failed");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, code = error.error_code(), "Request failed");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, code = error.error_code(), "Request failed");
        }
    }
}

static PRODUCTION_MODE: OnceLock<bool> = OnceLock::new();

/// Record once, at startup, whether error details should be hidden from
/// clients. Responses rendered before setup default to development behavior.
pub fn set_production_mode(production: bool) {
    let _ = PRODUCTION_MODE.set(production);
}

fn is_production() -> bool {
    PRODUCTION_MODE.get().copied().unwrap_or(false)
}

fn error_body(app_error: &AppError, production: bool) -> ErrorResponse {
    // Hide details in production and for sensitive errors.
    let details = if production || app_error.is_sensitive() {
        None
    } else {
        Some(app_error.to_string())
    };

    ErrorResponse {
        error: app_error.client_message(),
        details,
        code: app_error.error_code().to_string(),
        recoverable: app_error.is_recoverable(),
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        let body = Json(error_body(app_error, is_production()));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locator_exhaustion_maps_to_retrieval_failure() {
        let HttpAppError(app) = LocatorError::Exhausted.into();
        assert!(matches!(app, AppError::RetrievalExhausted(_)));
        assert_eq!(app.http_status_code(), 404);
    }

    #[test]
    fn test_locator_no_file_maps_to_not_found() {
        let HttpAppError(app) = LocatorError::NoFile.into();
        assert!(matches!(app, AppError::NotFound(_)));
    }

    #[test]
    fn test_production_mode_hides_details() {
        let err = AppError::NotFound("Question not found".to_string());
        assert!(error_body(&err, false).details.is_some());
        assert!(error_body(&err, true).details.is_none());
    }

    #[test]
    fn test_sensitive_errors_hide_details_in_any_mode() {
        let err = AppError::Internal("pool exhausted".to_string());
        assert!(error_body(&err, false).details.is_none());
        assert_eq!(error_body(&err, false).error, "An internal error occurred");
    }

    #[test]
    fn test_error_response_shape() {
        let response = ErrorResponse {
            error: "Not found".to_string(),
            details: None,
            code: "NOT_FOUND".to_string(),
            recoverable: false,
        };
        let json = serde_json::to_value(&response).expect("serialize");
        assert_eq!(json.get("error").and_then(|v| v.as_str()), Some("Not found"));
        assert_eq!(json.get("code").and_then(|v| v.as_str()), Some("NOT_FOUND"));
        assert!(json.get("details").is_none());
    }
}
