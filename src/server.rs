//! HTTP server initialization and runtime setup.
//!
//! Handles database connections, provider wiring, worker spawning, and Axum
//! server lifecycle.

use crate::application::collect_worker::run_collect_worker;
use crate::application::services::{CollectorService, InteractiveService, MirrorService, Resolvers};
use crate::config::Config;
use crate::domain::providers::SearchProvider;
use crate::infrastructure::persistence::SqliteMirrorRepository;
use crate::infrastructure::resolver::{BrowserResolver, HttpResolver, PassiveResolver};
use crate::infrastructure::search::build_provider;
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Opens the SQLite pool and applies pending migrations.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or a migration fails.
pub async fn connect_database(config: &Config) -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to migrate")?;

    Ok(pool)
}

/// Builds the three resolution strategies from configuration.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be constructed.
pub fn build_resolvers(config: &Config) -> Result<Resolvers> {
    let http = HttpResolver::new(config.resolve_timeout).context("Failed to build HTTP client")?;
    Ok(Resolvers {
        passive: Arc::new(PassiveResolver),
        http: Arc::new(http),
        browser: Arc::new(BrowserResolver::new(
            config.chrome_executable.clone(),
            config.browser_settle,
        )),
    })
}

/// Builds the collection pipeline over an open pool.
///
/// # Errors
///
/// Returns an error if the selected search backend has no credential, or if a
/// resolver cannot be built.
pub fn build_collector(
    config: &Config,
    pool: Arc<SqlitePool>,
) -> Result<CollectorService<SqliteMirrorRepository>> {
    let search = build_provider(config).context("Failed to configure search provider")?;
    let resolvers = build_resolvers(config)?;
    let repository = Arc::new(SqliteMirrorRepository::new(pool));

    Ok(CollectorService::new(repository, search, resolvers)
        .with_resolve_options(config.resolve_options()))
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - SQLite connection pool
/// - Apply migrations
/// - Search provider and resolvers
/// - Background collect worker
/// - Axum HTTP server
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - The search provider credential is missing
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = Arc::new(connect_database(&config).await?);

    let search = build_provider(&config).context("Failed to configure search provider")?;
    tracing::info!(provider = search.name(), "Search provider ready");

    let resolvers = build_resolvers(&config)?;
    let repository = Arc::new(SqliteMirrorRepository::new(pool.clone()));

    let collector = Arc::new(
        CollectorService::new(repository.clone(), search.clone(), resolvers.clone())
            .with_resolve_options(config.resolve_options()),
    );

    let (job_tx, job_rx) = mpsc::channel(config.job_queue_capacity);
    tokio::spawn(run_collect_worker(job_rx, collector));
    tracing::info!("Collect worker started");

    let mirror_service = Arc::new(MirrorService::new(repository));
    let interactive_service = Arc::new(InteractiveService::new(
        search,
        resolvers.browser,
        config.resolve_options(),
    ));

    let state = AppState::new(mirror_service, interactive_service, job_tx);

    let app = app_router(state, config.behind_proxy);

    let addr: SocketAddr = config.listen_addr.parse()?;
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

/// Resolves on Ctrl+C. Queued collect jobs are dropped with the runtime.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
