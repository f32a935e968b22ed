//! CVE Registry Backend
//!
//! CRUD over vulnerability records behind token authentication.
//!
//! ## Architecture
//!
//! The backend follows a layered architecture:
//! - Routes: HTTP request handling and routing
//! - Auth: header parsing, password hashing, token issue/verify
//! - Services: Validation and business rules
//! - Repositories: PostgreSQL or in-memory storage

use anyhow::Result;
use cve_registry_backend::{
    config::{self, StorageBackend},
    db,
    repositories::Storage,
    routes,
    state::AppState,
};
use secrecy::ExposeSecret;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    init_tracing();

    // Load configuration
    let config = config::AppConfig::load()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        env = if config::AppConfig::is_production() { "production" } else { "development" },
        storage = ?config.database.backend,
        "Starting CVE Registry Backend"
    );

    // Refuse to start without a signing secret
    if let Err(e) = config.auth.signing_secret() {
        error!("{}", e);
        return Err(e.into());
    }

    // Validate production configuration
    if config::AppConfig::is_production() {
        validate_production_config(&config)?;
    }

    let storage = match config.database.backend {
        StorageBackend::Postgres => {
            info!("Connecting to database...");
            let db_pool = db::connect(&config.database).await?;

            // Run migrations (skip in production if using separate migration job)
            if !config::AppConfig::is_production() {
                db::run_migrations(&db_pool).await?;
            }
            Storage::postgres(db_pool)
        }
        StorageBackend::Memory => {
            warn!("Using in-memory storage; data is lost on shutdown");
            Storage::in_memory()
        }
    };

    // Create application state
    let state = AppState::new(config.clone(), storage)?;

    // Build application
    let app = routes::create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!(address = %addr, "Server listening");

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    // Serve with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Initialize tracing/logging
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if config::AppConfig::is_production() {
            "cve_registry_backend=info,tower_http=info".into()
        } else {
            "cve_registry_backend=debug,tower_http=debug,sqlx=warn".into()
        }
    });

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if config::AppConfig::is_production() {
        // JSON logging for production (better for log aggregation)
        subscriber
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        // Pretty logging for development
        subscriber
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}

/// Validate configuration for production deployment
fn validate_production_config(config: &config::AppConfig) -> Result<()> {
    let mut errors = Vec::new();

    let secret_len = config
        .auth
        .secret_key
        .as_ref()
        .map_or(0, |secret| secret.expose_secret().len());
    if secret_len < 32 {
        errors.push("Signing secret must be at least 32 characters");
    }

    if config.database.backend == StorageBackend::Memory {
        warn!("In-memory storage selected in production - ensure this is intentional");
    }

    // Check database URL is not localhost in production
    if config.database.url.contains("localhost") || config.database.url.contains("127.0.0.1") {
        warn!("Database URL contains localhost - ensure this is intentional for production");
    }

    if !errors.is_empty() {
        for err in &errors {
            error!("Configuration error: {}", err);
        }
        anyhow::bail!("Invalid production configuration");
    }

    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
