//! CLI command definitions and dispatch.

pub mod admin;
pub mod config;
pub mod migrate;
pub mod queue;
pub mod trigger;

use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::output::OutputFormat;
use foodrx_core::config::AppConfig;
use foodrx_core::error::AppError;
use foodrx_core::types::RunContext;
use foodrx_database::DatabasePool;

/// FoodRx Notify: push notification pipeline operations
#[derive(Debug, Parser)]
#[command(name = "foodrx", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run one pipeline trigger now
    Trigger(trigger::TriggerArgs),
    /// Admin notifications
    Admin(admin::AdminArgs),
    /// Inspect the pending queue
    Queue(queue::QueueArgs),
    /// Apply database migrations
    Migrate,
    /// Configuration management
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Trigger(args) => trigger::execute(args, &self.config, self.format).await,
            Commands::Admin(args) => admin::execute(args, &self.config, self.format).await,
            Commands::Queue(args) => queue::execute(args, &self.config, self.format).await,
            Commands::Migrate => migrate::execute(&self.config).await,
            Commands::Config(args) => config::execute(args, &self.config, self.format).await,
        }
    }
}

/// Helper: load configuration from file
pub fn load_config(config_path: &str) -> Result<AppConfig, AppError> {
    AppConfig::load(config_path)
}

/// Helper: create the lazily connected pool
pub fn create_db_pool(config: &AppConfig) -> Result<DatabasePool, AppError> {
    DatabasePool::connect_lazy(&config.database)
}

/// Helper: a run context bounded by the pipeline deadline and cancelled on Ctrl+C
pub fn interruptible_run(config: &AppConfig) -> RunContext {
    let token = CancellationToken::new();
    let on_signal = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, stopping after the current page");
            on_signal.cancel();
        }
    });
    RunContext::child_of(&token, config.pipeline.run_deadline())
}
