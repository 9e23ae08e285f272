//! HTTP server initialization and runtime setup.
//!
//! Handles database connections, cache setup, notification transports,
//! worker spawning, and Axum server lifecycle.

use crate::config::Config;
use crate::domain::analytics_worker::run_analytics_worker;
use crate::infrastructure::cache::{CacheService, NullCache, RedisCache};
use crate::infrastructure::notify::{
    DisabledGateway, LogMailer, Mailer, SmsGateway, SmtpMailer, VonageGateway,
};
use crate::infrastructure::persistence::PgAnalyticsRepository;
use crate::routes::{RateLimits, app_router};
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool
/// - Apply migrations
/// - Redis cache (or NullCache fallback)
/// - SMTP mailer and SMS gateway (or their log-only stand-ins)
/// - Background analytics worker
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = connect_database(&config).await?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    let cache = connect_cache(&config).await;
    let mailer = build_mailer(&config);
    let sms_gateway = build_sms_gateway(&config);

    let (analytics_tx, analytics_rx) = mpsc::channel(config.analytics_queue_capacity);
    let analytics_repository = Arc::new(PgAnalyticsRepository::new(Arc::new(pool.clone())));
    tokio::spawn(run_analytics_worker(
        analytics_rx,
        analytics_repository,
        config.analytics_worker_concurrency,
    ));
    tracing::info!("Analytics worker started");

    let state = AppState::new(pool, &config, cache, analytics_tx, mailer, sms_gateway);

    let app = app_router(
        state,
        RateLimits {
            auth_per_minute: config.rate_limit_auth,
            api_per_minute: config.rate_limit_api,
        },
    );

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn connect_database(config: &Config) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")
}

async fn connect_cache(config: &Config) -> Arc<dyn CacheService> {
    let Some(redis_url) = &config.redis_url else {
        tracing::info!("Cache disabled (NullCache)");
        return Arc::new(NullCache::new());
    };

    match RedisCache::connect(redis_url, config.cache_ttl_seconds).await {
        Ok(redis) => {
            tracing::info!("Cache enabled (Redis)");
            Arc::new(redis)
        }
        Err(e) => {
            tracing::warn!("Failed to connect to Redis: {}. Using NullCache.", e);
            Arc::new(NullCache::new())
        }
    }
}

fn build_mailer(config: &Config) -> Arc<dyn Mailer> {
    let Some(smtp) = &config.smtp else {
        tracing::info!("SMTP not configured, emails will only be logged");
        return Arc::new(LogMailer);
    };

    match SmtpMailer::new(smtp, &config.mail_from) {
        Ok(mailer) => Arc::new(mailer),
        Err(e) => {
            tracing::warn!("Invalid SMTP settings: {}. Emails will only be logged.", e);
            Arc::new(LogMailer)
        }
    }
}

fn build_sms_gateway(config: &Config) -> Arc<dyn SmsGateway> {
    let Some(vonage) = &config.vonage else {
        tracing::info!("SMS gateway not configured, messages will fail");
        return Arc::new(DisabledGateway);
    };

    match VonageGateway::new(vonage.clone()) {
        Ok(gateway) => Arc::new(gateway),
        Err(e) => {
            tracing::warn!("Failed to create SMS client: {}. SMS disabled.", e);
            Arc::new(DisabledGateway)
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!("Failed to listen for SIGTERM: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
