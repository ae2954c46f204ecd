//! Database migration command.

use crate::output;
use foodrx_core::error::AppError;

/// Apply all pending migrations
pub async fn execute(config_path: &str) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let db = super::create_db_pool(&config)?;

    println!("Running database migrations...");
    foodrx_database::migration::run_migrations(db.pool()).await?;
    db.close().await;

    output::print_success("All migrations applied successfully.");
    Ok(())
}
