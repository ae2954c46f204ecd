//! Pending queue inspection commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use foodrx_core::error::AppError;
use foodrx_core::types::{KeysetPage, NotificationId};
use foodrx_database::{NotificationStore, Stores};
use foodrx_entity::notification::Notification;

/// Arguments for queue commands
#[derive(Debug, Args)]
pub struct QueueArgs {
    /// Queue subcommand
    #[command(subcommand)]
    pub command: QueueCommand,
}

/// Queue subcommands
#[derive(Debug, Subcommand)]
pub enum QueueCommand {
    /// Count pending notifications
    Status,
    /// List the oldest pending notifications
    Peek {
        /// Number of entries
        #[arg(short, long, default_value = "20")]
        limit: u32,
    },
}

#[derive(Debug, Serialize)]
struct QueueStatus {
    pending: u64,
}

/// One pending notification as displayed.
#[derive(Debug, Serialize, Tabled)]
struct PendingRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "User")]
    user_id: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Created")]
    created_at: String,
}

impl From<&Notification> for PendingRow {
    fn from(n: &Notification) -> Self {
        Self {
            id: n.id.to_string(),
            user_id: n.user_id.to_string(),
            kind: n.kind.as_str().to_string(),
            title: n.title.clone(),
            created_at: n.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Execute queue commands
pub async fn execute(
    args: &QueueArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let db = super::create_db_pool(&config)?;
    let stores = Stores::postgres(&db);

    let result = match &args.command {
        QueueCommand::Status => stores.notifications.count_pending().await.map(|pending| {
            output::print_item(&QueueStatus { pending }, format);
        }),
        QueueCommand::Peek { limit } => {
            let page: KeysetPage<NotificationId> = KeysetPage {
                after: None,
                limit: *limit,
            };
            stores.notifications.fetch_pending(&page).await.map(|pending| {
                let rows: Vec<PendingRow> = pending.iter().map(PendingRow::from).collect();
                output::print_list(&rows, format);
            })
        }
    };

    db.close().await;
    result
}
