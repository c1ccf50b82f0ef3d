//! Salary Raise Service - API Server Binary
//!
//! This binary starts the HTTP API server of the salary raise service.
//!
//! # Usage
//!
//! ```bash
//! # Run with default configuration
//! cargo run --bin salary-api
//!
//! # Run with environment variables
//! API_PORT=8080 DATABASE_URL=postgres://... API_RUN_MIGRATIONS=true cargo run --bin salary-api
//! ```
//!
//! # Environment Variables
//!
//! * `API_HOST` - Server host (default: 0.0.0.0)
//! * `API_PORT` - Server port (default: 8080)
//! * `API_DATABASE_URL` or `DATABASE_URL` - PostgreSQL connection string
//! * `API_LOG_LEVEL` or `RUST_LOG` - Log level or filter directive (default: info)
//! * `API_LOG_FORMAT` - `text` or `json` (default: text)
//! * `API_RAISE_PERCENT` - Raise applied by every endpoint (default: 10)
//! * `API_MAX_CONNECTIONS` - Database pool size (default: 10)
//! * `API_MIN_CONNECTIONS` - Idle connections kept open (default: 2)
//! * `API_ACQUIRE_TIMEOUT_SECS` - Wait for a free connection (default: 30)
//! * `API_RUN_MIGRATIONS` - Apply the bundled migrations on startup (default: false)

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use domain_payroll::SalaryService;
use infra_db::{create_pool, ping, run_migrations, PostgresPayrollAdapter};
use interface_api::{
    config::{ApiConfig, LogFormat},
    create_router,
};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Main entry point for the API server.
///
/// Initializes logging, loads configuration, establishes database connection,
/// and starts the HTTP server.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = ApiConfig::from_env().context("invalid API configuration")?;

    init_tracing(&config.log_level, config.log_format);

    let rate = config
        .raise_rate()
        .context("API_RAISE_PERCENT must describe a positive multiplier")?;

    tracing::info!(
        host = %config.host,
        port = %config.port,
        rate = %rate,
        "Starting salary raise API server"
    );

    let pool = create_pool(config.database_config())
        .await
        .context("failed to connect to the database")?;
    ping(&pool).await.context("database did not answer")?;
    tracing::info!("Database connection established");

    if config.run_migrations {
        run_migrations(&pool).await.context("failed to run migrations")?;
    }

    let adapter = PostgresPayrollAdapter::new(pool);
    let service = SalaryService::new(Arc::new(adapter)).with_rate(rate);
    let app = create_router(service);

    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .with_context(|| format!("invalid server address {}", config.server_addr()))?;

    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
fn init_tracing(log_level: &str, format: LogFormat) {
    let filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .init(),
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .init(),
    }
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// In-flight requests complete before the process exits.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
