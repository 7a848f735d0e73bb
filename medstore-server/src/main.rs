//! medstore-server — storefront and back office for a medical equipment store
//!
//! Long-running HTTP service that:
//! - Serves the public catalog and chat assistant
//! - Provides the admin back office (JWT cookie authenticated)
//! - Computes the sales analytics report over the order history

mod api;
mod auth;
mod config;
mod db;
mod llm;
mod state;
mod util;

use config::Config;
use state::AppState;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "medstore_server=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;

    tracing::info!("Starting medstore-server (env: {})", config.environment);

    // Connect, migrate, bootstrap the admin account
    let state = AppState::new(&config).await?;

    let app = api::create_router(state);

    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("medstore-server listening on {addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
