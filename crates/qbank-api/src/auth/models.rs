use crate::error::ErrorResponse;
use axum::extract::FromRequestParts;
use axum::http::{request::Parts, StatusCode};
use axum::Json;
use qbank_core::models::User;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims structure. Token issuance happens elsewhere; this service only
/// verifies HS256 bearer tokens.
#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: Uuid, // user_id
    pub exp: i64,  // expiration timestamp
    pub iat: i64,  // issued at timestamp
}

/// Authenticated user extracted from the bearer token and stored in request
/// extensions by the auth middleware.
#[derive(Debug, Clone)]
pub struct RequestUser(pub User);

impl<S> FromRequestParts<S> for RequestUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestUser>()
            .cloned()
            .ok_or_else(|| {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(ErrorResponse {
                        error: "Missing authenticated user".to_string(),
                        details: None,
                        code: "MISSING_AUTH_CONTEXT".to_string(),
                        recoverable: false,
                    }),
                )
            })
    }
}
