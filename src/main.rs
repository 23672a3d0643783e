mod config;
mod db;
mod handlers;
mod models;
mod registration;

use anyhow::{Context, Result};
use axum::{
    http::{request::Parts, HeaderValue},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub struct AppState {
    pub db_pool: SqlitePool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "game_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenv::dotenv().ok();

    let config = config::Config::from_env().context("Invalid configuration")?;

    // Set up database
    tracing::info!("Connecting to database: {}", config.database_url);
    let db_pool = db::create_pool(&config.database_url).await
        .context("Failed to create database pool")?;

    tracing::info!("Running database migrations");
    db::run_migrations(&db_pool).await
        .context("Failed to run migrations")?;

    let state = Arc::new(AppState { db_pool });
    let app = router(state, &config.allowed_origins);

    // Start server
    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: Arc<AppState>, allowed_origins: &[String]) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/register-player/", post(handlers::register_player))
        .route("/register-player", post(handlers::register_player))
        .route("/test_registration", post(handlers::test_registration))
        .layer(cors_layer(allowed_origins.to_vec()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Credentialed CORS can't use wildcards, so methods and headers mirror the
/// preflight and origins are checked against the configured list.
fn cors_layer(allowed_origins: Vec<String>) -> CorsLayer {
    tracing::info!("CORS allowed origins: {:?}", allowed_origins);

    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _parts: &Parts| {
                origin.to_str().is_ok_and(|origin| {
                    allowed_origins
                        .iter()
                        .any(|pattern| config::origin_matches(pattern, origin))
                })
            },
        ))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "Welcome to the game backend!" }))
}

async fn health_check() -> &'static str {
    "OK"
}
