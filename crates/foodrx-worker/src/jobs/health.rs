//! The `test` trigger.

use async_trait::async_trait;
use serde_json::Value;

use foodrx_core::types::RunContext;

use crate::executor::{JobExecutionError, JobHandler};
use crate::trigger::TriggerKind;

/// Answers the `test` trigger without touching any store.
#[derive(Debug, Default)]
pub struct HealthCheckJobHandler;

#[async_trait]
impl JobHandler for HealthCheckJobHandler {
    fn trigger(&self) -> TriggerKind {
        TriggerKind::Test
    }

    async fn execute(&self, _ctx: &RunContext) -> Result<Value, JobExecutionError> {
        Ok(serde_json::json!({ "message": "Notification pipeline is working" }))
    }
}
