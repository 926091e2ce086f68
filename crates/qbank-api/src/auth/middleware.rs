//! Bearer-token authentication middleware.
//!
//! Verifies an HS256 JWT, loads the user row it names, and stores a
//! `RequestUser` in request extensions for handlers to extract.

use crate::auth::models::{JwtClaims, RequestUser};
use crate::error::HttpAppError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use qbank_core::AppError;
use qbank_db::UserRepository;
use std::sync::Arc;

#[derive(Clone)]
pub struct AuthState {
    pub jwt_secret: String,
    pub users: UserRepository,
}

pub async fn auth_middleware(
    State(auth_state): State<Arc<AuthState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = match request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
    {
        Some(h) => h,
        None => {
            return HttpAppError(AppError::Unauthorized(
                "Access denied. No token provided.".to_string(),
            ))
            .into_response();
        }
    };

    let Some(token) = auth_header.strip_prefix("Bearer ") else {
        return HttpAppError(AppError::Unauthorized(
            "Invalid authorization header format".to_string(),
        ))
        .into_response();
    };

    let claims = match decode::<JwtClaims>(
        token,
        &DecodingKey::from_secret(auth_state.jwt_secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    ) {
        Ok(data) => data.claims,
        Err(e) => {
            tracing::debug!(error = %e, "Token verification failed");
            let message = match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => "Token expired.",
                _ => "Invalid token.",
            };
            return HttpAppError(AppError::Unauthorized(message.to_string())).into_response();
        }
    };

    let user = match auth_state.users.get_by_id(claims.sub).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return HttpAppError(AppError::Unauthorized(
                "Invalid token. User not found.".to_string(),
            ))
            .into_response();
        }
        Err(e) => return HttpAppError(e).into_response(),
    };

    tracing::debug!(user_id = %user.id, username = %user.username, "Authenticated");
    request.extensions_mut().insert(RequestUser(user));
    next.run(request).await
}
