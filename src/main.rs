//! Bank Account Service - Main Application Entry Point
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Create database connection pool
//! 3. Run database migrations
//! 4. Build HTTP router with routes and middleware
//! 5. Start server on configured address

use std::sync::Arc;

use secrecy::ExposeSecret;
use tracing_subscriber::EnvFilter;

use bank_account_service::{
    auth::{password::PasswordHasher, token::TokenIssuer},
    config::Config,
    routes,
    state::AppState,
    store::PgAccountStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with tracing subscriber. Reads RUST_LOG environment variable (defaults to "info" level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Load configuration; a missing signing key or database URL stops startup here
    let config = Config::from_env()?;
    tracing::info!(
        listen_addr = %config.listen_addr,
        token_ttl_secs = config.token_ttl_secs,
        "Configuration loaded"
    );

    // Connect to the database
    let store = PgAccountStore::connect(config.database_url.expose_secret()).await?;
    tracing::info!("Database pool created");

    // Run migrations
    store.migrate().await?;
    tracing::info!("Database migrations complete");

    let state = AppState::new(
        Arc::new(store),
        TokenIssuer::new(&config.jwt_secret, config.token_ttl()),
        PasswordHasher::new(config.bcrypt_cost),
    );

    let app = routes::router(state, config.request_timeout());

    // Bind to network address and start server
    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    tracing::info!("Server listening on {}", config.listen_addr);

    // Start serving HTTP requests
    axum::serve(listener, app).await?;

    Ok(())
}
