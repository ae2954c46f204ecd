//! Admin notification CLI commands.

use clap::{Args, Subcommand};

use crate::output::{self, OutputFormat};
use foodrx_core::error::AppError;
use foodrx_core::types::UserId;
use foodrx_database::Stores;
use foodrx_service::{AdminNotificationRequest, AdminNotificationService};

/// Arguments for admin commands
#[derive(Debug, Args)]
pub struct AdminArgs {
    /// Admin subcommand
    #[command(subcommand)]
    pub command: AdminCommand,
}

/// Admin subcommands
#[derive(Debug, Subcommand)]
pub enum AdminCommand {
    /// Queue a notification for one or more users
    Send {
        /// Recipient user id (repeatable)
        #[arg(short, long = "user", required = true)]
        users: Vec<UserId>,
        /// Title
        #[arg(short, long)]
        title: String,
        /// Message body
        #[arg(short, long)]
        message: String,
        /// Notification type
        #[arg(short, long)]
        kind: Option<String>,
        /// Priority: high or normal
        #[arg(short, long)]
        priority: Option<String>,
    },
}

/// Execute admin commands
pub async fn execute(
    args: &AdminArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let db = super::create_db_pool(&config)?;
    let service = AdminNotificationService::new(&Stores::postgres(&db));

    match &args.command {
        AdminCommand::Send {
            users,
            title,
            message,
            kind,
            priority,
        } => {
            let result = service
                .send(AdminNotificationRequest {
                    user_ids: users.clone(),
                    title: title.clone(),
                    message: message.clone(),
                    kind: kind.clone(),
                    priority: priority.clone(),
                })
                .await;
            db.close().await;
            let result = result?;

            match format {
                OutputFormat::Table => output::print_success(&format!(
                    "Queued {} notification(s); they go out on the next delivery run",
                    result.notifications_created
                )),
                OutputFormat::Json => output::print_item(&result, format),
            }
        }
    }

    Ok(())
}
