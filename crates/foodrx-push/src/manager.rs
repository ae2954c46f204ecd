//! Push manager that dispatches to the configured provider.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use foodrx_core::config::PushConfig;
use foodrx_core::error::AppError;
use foodrx_core::result::AppResult;
use foodrx_core::traits::push::{DeliveryId, PushError, PushGateway, PushMessage};

use crate::dry_run::DryRunGateway;
use crate::fcm::FcmGateway;

/// Push manager that wraps the configured push gateway.
///
/// The provider is selected at construction time based on configuration.
#[derive(Debug, Clone)]
pub struct PushManager {
    inner: Arc<dyn PushGateway>,
}

impl PushManager {
    /// Create a new push manager from configuration.
    pub fn new(config: &PushConfig) -> AppResult<Self> {
        let inner: Arc<dyn PushGateway> = match config.provider.as_str() {
            "fcm" => {
                info!("Initializing FCM push gateway");
                Arc::new(FcmGateway::new(config)?)
            }
            "dry_run" => {
                info!("Initializing dry-run push gateway");
                Arc::new(DryRunGateway::new())
            }
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown push provider: '{other}'. Supported: fcm, dry_run"
                )));
            }
        };

        Ok(Self { inner })
    }

    /// Create a push manager from an existing gateway (for testing).
    pub fn from_gateway(gateway: Arc<dyn PushGateway>) -> Self {
        Self { inner: gateway }
    }
}

#[async_trait]
impl PushGateway for PushManager {
    fn provider_type(&self) -> &str {
        self.inner.provider_type()
    }

    async fn send(&self, message: &PushMessage) -> Result<DeliveryId, PushError> {
        self.inner.send(message).await
    }
}
