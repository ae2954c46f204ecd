//! Digest and reminder generation jobs.

use async_trait::async_trait;
use serde_json::Value;

use foodrx_core::types::RunContext;
use foodrx_service::{GenerationEngine, GenerationTrigger};

use crate::executor::{JobExecutionError, JobHandler};
use crate::trigger::TriggerKind;

/// Runs one generation mode.
#[derive(Debug)]
pub struct GenerationJobHandler {
    engine: GenerationEngine,
    mode: GenerationTrigger,
}

impl GenerationJobHandler {
    /// Create a handler for one generation mode.
    pub fn new(engine: GenerationEngine, mode: GenerationTrigger) -> Self {
        Self { engine, mode }
    }
}

#[async_trait]
impl JobHandler for GenerationJobHandler {
    fn trigger(&self) -> TriggerKind {
        match self.mode {
            GenerationTrigger::ExpiringIngredients => TriggerKind::ExpiringIngredients,
            GenerationTrigger::TrackerReminder => TriggerKind::TrackerReminder,
        }
    }

    async fn execute(&self, ctx: &RunContext) -> Result<Value, JobExecutionError> {
        let report = self.engine.generate(self.mode, ctx).await?;
        serde_json::to_value(report)
            .map_err(|e| JobExecutionError::Permanent(format!("Unserializable report: {e}")))
    }
}
