use std::sync::Arc;

use price_api::{
    config::{AppConfig, StorageBackend},
    create_router, db,
    prices::{InMemoryPriceRepository, PgPriceRepository, PriceRepository, PriceService},
    AppState,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Invalid configuration: {}", err);
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_level(true)
        .init();

    tracing::info!("Price API - Starting...");

    let repository: Arc<dyn PriceRepository> = match config.storage {
        StorageBackend::Postgres => {
            // from_env guarantees a URL for the postgres backend
            let database_url = config.database_url.as_deref().unwrap_or_default();

            tracing::info!("Connecting to database...");
            let pool = db::create_pool(database_url, config.max_connections)
                .await
                .expect("Failed to create database pool");
            db::run_migrations(&pool)
                .await
                .expect("Failed to run database migrations");

            Arc::new(PgPriceRepository::new(pool))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; prices are lost on restart");
            Arc::new(InMemoryPriceRepository::new())
        }
    };

    let state = AppState::new(PriceService::new(repository));
    let app = create_router(state, &config.prices_path());

    let addr = config.bind_address();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Price API is running on http://{}{}", addr, config.prices_path());
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    axum::serve(listener, app).await.expect("Server error");
}
