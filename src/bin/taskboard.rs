//! Runs the task management HTTP server.
//!
//! Configuration comes from flags, environment variables, and an optional
//! `.env` file; see `taskboard --help`.

use eyre::{WrapErr, eyre};
use mockable::DefaultClock;
use std::sync::Arc;
use taskboard::config::{ServerConfig, StoreKind};
use taskboard::http::{AppState, router};
use taskboard::task::adapters::memory::InMemoryTaskRepository;
use taskboard::task::adapters::postgres::PostgresTaskRepository;
use taskboard::task::ports::TaskRepository;
use taskboard::task::services::TaskService;
use taskboard::telemetry;
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // A missing .env file is normal.
    dotenvy::dotenv().ok();
    let config = <ServerConfig as clap::Parser>::parse();
    telemetry::init(&config.log_filter)?;

    match config.store {
        StoreKind::Memory => {
            warn!("using the in-memory store; tasks are lost on exit");
            serve(&config, InMemoryTaskRepository::new()).await
        }
        StoreKind::Postgres => {
            let url = config.database_url()?;
            let pool_size = config.pool_size()?;
            let repository = PostgresTaskRepository::connect(url, pool_size)
                .wrap_err("failed to connect to PostgreSQL")?;
            let applied = repository
                .run_migrations()
                .await
                .wrap_err("failed to run database migrations")?;
            info!(applied, "database schema is up to date");
            serve(&config, repository).await
        }
    }
}

async fn serve<R>(config: &ServerConfig, repository: R) -> eyre::Result<()>
where
    R: TaskRepository + 'static,
{
    let service = TaskService::new(Arc::new(repository), Arc::new(DefaultClock));
    let mut state = AppState::new(service);
    if let Some(token) = config.api_token() {
        info!("bearer token required on task routes");
        state = state.with_api_token(token);
    }

    let listener = TcpListener::bind(config.bind)
        .await
        .wrap_err_with(|| format!("failed to bind {}", config.bind))?;
    let address = listener
        .local_addr()
        .map_err(|err| eyre!("listener has no local address: {err}"))?;
    info!(%address, "taskboard listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .wrap_err("server terminated unexpectedly")?;
    info!("taskboard stopped");
    Ok(())
}

async fn shutdown_signal() {
    stop_on(tokio::signal::ctrl_c()).await;
}

/// Resolves when `signal` fires. A signal that cannot be installed never
/// resolves, so the server keeps running instead of stopping at once.
async fn stop_on(signal: impl Future<Output = std::io::Result<()>>) {
    if let Err(err) = signal.await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
