//! FoodRx Notifier: scheduled push notification pipeline.
//!
//! Main entry point that wires the stores, push gateway, engines and cron
//! scheduler together and runs until a shutdown signal arrives.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{EnvFilter, fmt};

use foodrx_core::config::AppConfig;
use foodrx_core::error::AppError;
use foodrx_core::traits::push::PushGateway;
use foodrx_database::{DatabasePool, Stores};
use foodrx_push::PushManager;
use foodrx_worker::{CronScheduler, pipeline_executor};

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Notifier stopped with an error");
        std::process::exit(1);
    }
}

/// Load configuration from file and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let config_path =
        std::env::var("FOODRX_CONFIG").unwrap_or_else(|_| "config/default.toml".to_string());
    AppConfig::load(&config_path)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main notifier run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting FoodRx Notifier v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Database pool (connects on first use) ────────────
    let db = DatabasePool::connect_lazy(&config.database)?;
    let stores = Stores::postgres(&db);

    // ── Step 2: Push gateway ─────────────────────────────────────
    tracing::info!(provider = %config.push.provider, "Initializing push gateway...");
    let gateway: Arc<dyn PushGateway> = Arc::new(PushManager::new(&config.push)?);

    // ── Step 3: Engines and trigger handlers ─────────────────────
    let executor = Arc::new(pipeline_executor(&stores, gateway, &config)?);
    tracing::info!(
        triggers = ?executor.registered_triggers(),
        "Trigger handlers registered"
    );

    // ── Step 4: Scheduler ────────────────────────────────────────
    let shutdown = CancellationToken::new();
    let mut scheduler = if config.scheduler.enabled {
        let scheduler = CronScheduler::new(
            Arc::clone(&executor),
            shutdown.clone(),
            config.pipeline.run_deadline(),
        )
        .await?;
        scheduler.register_default_tasks(&config.scheduler).await?;
        scheduler.start().await?;
        Some(scheduler)
    } else {
        tracing::warn!("Scheduler disabled; triggers run only through the CLI");
        None
    };

    // ── Step 5: Graceful shutdown ────────────────────────────────
    shutdown_signal().await;
    tracing::info!("Shutdown signal received, stopping in-flight runs...");
    shutdown.cancel();

    if let Some(scheduler) = scheduler.as_mut() {
        if let Err(e) = scheduler.shutdown().await {
            tracing::warn!(error = %e, "Scheduler shutdown failed");
        }
    }
    db.close().await;

    tracing::info!("FoodRx Notifier shut down");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
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
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
