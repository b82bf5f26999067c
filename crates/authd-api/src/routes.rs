//! API route definitions

use crate::auth::middleware::{attach_current_account, require_token};
use crate::handlers::auth;
use crate::state::AppState;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Create the account API routes
///
/// Protected routes sit behind the two-gate authorization chain. The
/// layers run outermost-first: token verification, then current-account
/// resolution, so the resolution gate never sees an unverified request.
pub fn api_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login));

    // Protected routes (bearer token required)
    let protected_routes = Router::new()
        .route("/password-reset", post(auth::password_reset))
        .route("/profile", get(auth::profile))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            attach_current_account,
        ))
        .route_layer(middleware::from_fn_with_state(state, require_token));

    Router::new().merge(public_routes).merge(protected_routes)
}
