//! Configuration management CLI commands.

use clap::{Args, Subcommand};

use crate::output::{self, OutputFormat};
use foodrx_core::error::AppError;
use foodrx_database::connection::mask_password;

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration with secrets masked
    Show,
    /// Validate the configuration file
    Validate,
}

/// Execute config commands
pub async fn execute(
    args: &ConfigArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        ConfigCommand::Show => {
            let mut config = super::load_config(config_path)?;
            config.database.url = mask_password(&config.database.url);
            if config.push.service_account_b64.is_some() {
                config.push.service_account_b64 = Some("****".to_string());
            }
            match format {
                OutputFormat::Json => output::print_item(&config, format),
                OutputFormat::Table => {
                    println!("[database]");
                    output::print_item(&config.database, format);
                    println!("[push]");
                    output::print_item(&config.push, format);
                    println!("[pipeline]");
                    output::print_item(&config.pipeline, format);
                    println!("[scheduler]");
                    output::print_item(&config.scheduler, format);
                    println!("[logging]");
                    output::print_item(&config.logging, format);
                }
            }
        }
        ConfigCommand::Validate => match super::load_config(config_path) {
            Ok(config) => {
                output::print_success(&format!("Configuration '{config_path}' is valid"));
                output::print_kv("Database", &mask_password(&config.database.url));
                output::print_kv("Push provider", &config.push.provider);
                output::print_kv("Batch size", &config.pipeline.batch_size.to_string());
                output::print_kv(
                    "Scheduler",
                    if config.scheduler.enabled { "enabled" } else { "disabled" },
                );
            }
            Err(e) => {
                output::print_error(&format!("Configuration invalid: {e}"));
                return Err(e);
            }
        },
    }

    Ok(())
}
