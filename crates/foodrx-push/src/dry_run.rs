//! Gateway that logs messages instead of sending them.

use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use foodrx_core::traits::push::{DeliveryId, PushError, PushGateway, PushMessage};

/// Push gateway that accepts every message without contacting a provider.
#[derive(Debug, Clone, Default)]
pub struct DryRunGateway;

impl DryRunGateway {
    /// Create a dry-run gateway.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PushGateway for DryRunGateway {
    fn provider_type(&self) -> &str {
        "dry_run"
    }

    async fn send(&self, message: &PushMessage) -> Result<DeliveryId, PushError> {
        let id = format!("dry-run/{}", Uuid::new_v4());
        info!(
            delivery_id = %id,
            title = %message.title,
            notification_id = message.data.get("notificationId").map(String::as_str).unwrap_or(""),
            "Dry-run push accepted"
        );
        Ok(DeliveryId(id))
    }
}
