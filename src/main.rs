use std::sync::Arc;

use account_api::{
    auth::repository::PgAccountDirectory, config::AppConfig, create_router, db, AppState,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "account_api=debug,tower_http=info".into()),
        )
        .with_target(false)
        .with_level(true)
        .init();

    tracing::info!("Account API - Starting...");

    let config = AppConfig::from_env().expect("Invalid configuration");
    tracing::debug!("Loaded configuration: {:?}", config.token);

    // Create database connection pool
    tracing::info!("Connecting to database...");
    let db_pool = db::create_pool(&config.database_url)
        .await
        .expect("Failed to create database pool");

    // Run SQLx migrations on startup
    db::run_migrations(&db_pool)
        .await
        .expect("Failed to run database migrations");

    let directory = Arc::new(PgAccountDirectory::new(db_pool));
    let app = create_router(AppState::new(directory, &config.token));

    // Start the Axum server
    let addr = config.bind_addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Account API is running on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    axum::serve(listener, app).await.expect("Server error");
}
