//! Run a pipeline trigger once.

use std::sync::Arc;

use clap::Args;

use crate::output::{self, OutputFormat};
use foodrx_core::error::AppError;
use foodrx_core::traits::push::PushGateway;
use foodrx_database::Stores;
use foodrx_push::PushManager;
use foodrx_worker::{TriggerKind, pipeline_executor};

/// Arguments for the trigger command
#[derive(Debug, Args)]
pub struct TriggerArgs {
    /// expiring_ingredients, tracker_reminder, scheduled-delivery,
    /// daily-reset, weekly-reset or test
    pub kind: TriggerKind,

    /// Log pushes instead of sending them
    #[arg(long)]
    pub dry_run: bool,
}

/// Execute the trigger command
pub async fn execute(
    args: &TriggerArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let mut config = super::load_config(config_path)?;
    if args.dry_run {
        config.push.provider = "dry_run".to_string();
    }

    let db = super::create_db_pool(&config)?;
    let stores = Stores::postgres(&db);
    let gateway: Arc<dyn PushGateway> = Arc::new(PushManager::new(&config.push)?);
    let executor = pipeline_executor(&stores, gateway, &config)?;

    let ctx = super::interruptible_run(&config);
    let result = executor.execute(args.kind, &ctx).await;
    db.close().await;

    let outcome = result?;
    if format == OutputFormat::Table {
        output::print_success(&format!("Trigger '{}' finished", outcome.trigger));
    }
    output::print_item(&outcome.report, format);
    Ok(())
}
