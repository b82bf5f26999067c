//! authd API server

use authd_api::{create_router, state::AppState};
use authd_core::config::{AppConfig, LoggingConfig};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;
    init_tracing(&config.logging);

    let pool = PgPoolOptions::new()
        .max_connections(config.database.pool_size)
        .connect(&config.database.postgres_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = Arc::new(AppState::new(config, pool));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("authd API server listening on http://{addr}");
    tracing::info!("Swagger UI available at http://{addr}/swagger-ui/");

    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing(config: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "authd_api={level},authd_core={level},tower_http={level}",
            level = config.level
        )
        .into()
    });

    if config.json_format {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
