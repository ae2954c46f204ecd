//! Pending notification delivery job.

use async_trait::async_trait;
use serde_json::Value;

use foodrx_core::types::RunContext;
use foodrx_service::DeliveryEngine;

use crate::executor::{JobExecutionError, JobHandler};
use crate::trigger::TriggerKind;

/// Drains the pending queue.
#[derive(Debug)]
pub struct DeliveryJobHandler {
    engine: DeliveryEngine,
}

impl DeliveryJobHandler {
    /// Create a delivery handler.
    pub fn new(engine: DeliveryEngine) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl JobHandler for DeliveryJobHandler {
    fn trigger(&self) -> TriggerKind {
        TriggerKind::ScheduledDelivery
    }

    async fn execute(&self, ctx: &RunContext) -> Result<Value, JobExecutionError> {
        let report = self.engine.deliver_pending(ctx).await?;
        serde_json::to_value(report)
            .map_err(|e| JobExecutionError::Permanent(format!("Unserializable report: {e}")))
    }
}
