//! Account API handlers

use crate::auth::{
    Account, AccountService, LoginRequest, RegisterRequest, ResetPasswordRequest,
};
use crate::error::AppError;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Extension, Json};
use std::sync::Arc;

/// Register a new account
///
/// Unknown body fields beyond name/email/password are stored as profile
/// data on the created account.
///
/// # Responses
///
/// * `201 Created` - Account created
/// * `400 Bad Request` - Weak password or malformed email
/// * `404 Not Found` - Email already registered
#[utoipa::path(
    post,
    path = "/signup",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = Account),
        (status = 400, description = "Weak password or malformed email", body = crate::error::ApiError),
        (status = 404, description = "Email already registered", body = crate::error::ApiError),
        (status = 500, description = "Internal server error", body = crate::error::ApiError),
    )
)]
pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let service = AccountService::new(state.pool.clone(), state.config.auth.clone());
    let account = service.register(request).await?;

    Ok((StatusCode::CREATED, Json(account)))
}

/// Login with email and password
///
/// Returns a minimal profile and a signed session token valid for the
/// configured window (6 hours by default).
#[utoipa::path(
    post,
    path = "/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = crate::auth::LoginResponse),
        (status = 400, description = "Invalid credentials", body = crate::error::ApiError),
        (status = 401, description = "Invalid credentials", body = crate::error::ApiError),
        (status = 500, description = "Internal server error", body = crate::error::ApiError),
    )
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let service = AccountService::new(state.pool.clone(), state.config.auth.clone());
    let response = service.login(request).await?;

    Ok(Json(response))
}

/// Replace the authenticated account's password
///
/// Requires a valid bearer token; the authorization chain has already
/// resolved the live account record.
#[utoipa::path(
    post,
    path = "/password-reset",
    tag = "auth",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password updated", body = Account),
        (status = 400, description = "Missing fields, weak or mismatched passwords", body = crate::error::ApiError),
        (status = 401, description = "Wrong current password or invalid token", body = crate::error::ApiError),
        (status = 500, description = "Internal server error", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn password_reset(
    State(state): State<Arc<AppState>>,
    Extension(account): Extension<Account>,
    Json(request): Json<ResetPasswordRequest>,
) -> Result<impl IntoResponse, AppError> {
    let service = AccountService::new(state.pool.clone(), state.config.auth.clone());
    let updated = service.reset_password(&account, request).await?;

    Ok(Json(updated))
}

/// Get the authenticated account's profile
///
/// Returns the record the authorization chain resolved for this request.
/// The missing-extension branch is defensive; the chain rejects requests
/// before a handler can run without one.
#[utoipa::path(
    get,
    path = "/profile",
    tag = "auth",
    responses(
        (status = 200, description = "Current account", body = Account),
        (status = 401, description = "Invalid token", body = crate::error::ApiError),
        (status = 404, description = "Account not resolved", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn profile(
    account: Option<Extension<Account>>,
) -> Result<impl IntoResponse, AppError> {
    match account {
        Some(Extension(account)) => Ok(Json(account)),
        None => Err(AppError::NotFound("Account not found.".to_string())),
    }
}
