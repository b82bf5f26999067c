//! authd API - account and session credential HTTP service
//!
//! Issues and validates session credentials for a user account service:
//! registration with salted password hashing, login with signed expiring
//! session tokens, token-gated password reset and profile retrieval.

pub mod audit;
pub mod auth;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

use axum::{http::HeaderValue, routing::get, Router};
use state::AppState;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::signup,
        handlers::auth::login,
        handlers::auth::password_reset,
        handlers::auth::profile,
        handlers::health::health_check,
        handlers::health::readiness_check,
    ),
    components(schemas(
        auth::Account,
        auth::AccountProfile,
        auth::RegisterRequest,
        auth::LoginRequest,
        auth::LoginResponse,
        auth::ResetPasswordRequest,
        error::ApiError,
        handlers::health::HealthResponse,
        handlers::health::ReadinessResponse,
    )),
    tags(
        (name = "auth", description = "Account registration, login, and credential management"),
        (name = "health", description = "Service health probes"),
    )
)]
pub struct ApiDoc;

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let router = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        .merge(routes::api_routes(state.clone()))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http());

    let router = if state.config.server.cors_enabled {
        router.layer(cors_layer(&state.config.server.cors_origins))
    } else {
        router
    };

    router.with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
        layer.allow_origin(AllowOrigin::list(origins))
    }
}

/// Build a router backed by a lazy pool and a fixed test secret
///
/// The pool connects on first use, so routes that reject a request before
/// any datastore access can be exercised without a database.
#[cfg(any(test, feature = "test-utils"))]
pub fn create_router_for_testing() -> Router {
    use authd_core::config::AppConfig;
    use sqlx::postgres::PgPoolOptions;

    let mut config = AppConfig::default();
    config.auth.token_secret = "test-signing-secret".to_string();

    let pool = PgPoolOptions::new()
        .connect_lazy(&config.database.postgres_url)
        .expect("lazy pool construction cannot fail on a well-formed URL");

    let state = Arc::new(AppState::new(config, pool));
    create_router(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use authd_core::config::AppConfig;
    use axum::body::Body;
    use axum::http::Request;
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    fn router_with_cors(enabled: bool) -> Router {
        let mut config = AppConfig::default();
        config.server.cors_enabled = enabled;

        let pool = PgPoolOptions::new()
            .connect_lazy(&config.database.postgres_url)
            .unwrap();

        create_router(Arc::new(AppState::new(config, pool)))
    }

    #[tokio::test]
    async fn test_cors_headers_present_when_enabled() {
        let response = router_with_cors(true)
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header("Origin", "http://localhost:3000")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(response
            .headers()
            .contains_key("access-control-allow-origin"));
    }

    #[tokio::test]
    async fn test_cors_headers_absent_when_disabled() {
        let response = router_with_cors(false)
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header("Origin", "http://localhost:3000")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(!response
            .headers()
            .contains_key("access-control-allow-origin"));
    }
}
