//! Authorization middleware chain for protected routes
//!
//! Two ordered, short-circuiting gates:
//! 1. [`require_token`] extracts the bearer token from the Authorization
//!    header and verifies its signature and expiry, attaching the decoded
//!    [`Claims`] to request extensions.
//! 2. [`attach_current_account`] resolves the claim's email against the
//!    live account store, attaching the full [`Account`] record.
//!
//! The second gate never runs if the first fails. A valid token whose
//! account has since been deleted fails at gate 2 with 401.

use super::models::Account;
use super::repository::{AccountRepository, RepositoryError};
use super::token::{verify_token, Claims, TokenError};
use crate::audit::{audit_log, AuditEvent};
use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use thiserror::Error;

/// Authorization gate errors
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing Authorization header")]
    MissingAuthHeader,

    #[error("Invalid Authorization header format")]
    InvalidAuthHeader,

    #[error("Invalid token: {0}")]
    InvalidToken(#[from] TokenError),

    #[error("No account matches the presented token")]
    UnknownAccount,

    #[error("Datastore error during account resolution: {0}")]
    Store(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AuthError::MissingAuthHeader => (
                StatusCode::UNAUTHORIZED,
                ApiError::unauthorized("Missing Authorization header"),
            ),
            AuthError::InvalidAuthHeader => (
                StatusCode::UNAUTHORIZED,
                ApiError::unauthorized("Invalid Authorization header format"),
            ),
            AuthError::InvalidToken(_) => (
                StatusCode::UNAUTHORIZED,
                ApiError::unauthorized("Invalid or expired token"),
            ),
            AuthError::UnknownAccount => (
                StatusCode::UNAUTHORIZED,
                ApiError::unauthorized("Invalid or expired token"),
            ),
            AuthError::Store(detail) => {
                tracing::error!("account resolution failed: {detail}");
                (StatusCode::INTERNAL_SERVER_ERROR, ApiError::internal_error())
            }
        };

        (status, Json(error)).into_response()
    }
}

/// Extract the bearer token from the Authorization header
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthHeader)?;

    auth_header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidAuthHeader)
}

/// Token verification gate
///
/// Fails 401 if the header is absent or the token does not verify; on
/// success attaches the decoded claims to the request and continues.
pub async fn require_token(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = bearer_token(request.headers())?;

    let claims = match verify_token(&state.config.auth, token) {
        Ok(claims) => claims,
        Err(e) => {
            audit_log(&AuditEvent::InvalidToken {
                reason: e.to_string(),
            });
            return Err(AuthError::InvalidToken(e));
        }
    };

    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}

/// Current-account resolution gate
///
/// Takes the verified claim's email and looks up the live account record.
/// Fails 401 if no such account exists (e.g. it was deleted after the token
/// was issued); on success attaches the full record for handlers to extract
/// with `Extension<Account>`.
pub async fn attach_current_account(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    // Gate ordering guarantees the claims are present; treat absence as an
    // unauthenticated request rather than panicking.
    let claims = request
        .extensions()
        .get::<Claims>()
        .cloned()
        .ok_or(AuthError::MissingAuthHeader)?;

    let repository = AccountRepository::new(state.pool.clone());
    let account = match repository.find_by_email(&claims.email).await {
        Ok(account) => account,
        Err(RepositoryError::AccountNotFound) => {
            audit_log(&AuditEvent::InvalidToken {
                reason: format!("token references unknown account {}", claims.email),
            });
            return Err(AuthError::UnknownAccount);
        }
        Err(e) => return Err(AuthError::Store(e.to_string())),
    };

    request.extensions_mut().insert(account);

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer abc.def.ghi"),
        );

        assert_eq!(bearer_token(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_missing_header() {
        let headers = HeaderMap::new();
        assert!(matches!(
            bearer_token(&headers),
            Err(AuthError::MissingAuthHeader)
        ));
    }

    #[test]
    fn test_wrong_scheme() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Basic dXNlcjpwYXNz"),
        );

        assert!(matches!(
            bearer_token(&headers),
            Err(AuthError::InvalidAuthHeader)
        ));
    }

    #[test]
    fn test_auth_errors_map_to_unauthorized() {
        for err in [
            AuthError::MissingAuthHeader,
            AuthError::InvalidAuthHeader,
            AuthError::InvalidToken(TokenError::Expired),
            AuthError::UnknownAccount,
        ] {
            let response = err.into_response();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        }
    }
}
