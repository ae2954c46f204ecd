//! Daily and weekly period reset jobs.

use async_trait::async_trait;
use serde_json::Value;

use foodrx_core::types::RunContext;
use foodrx_entity::tracker::PeriodType;
use foodrx_service::PeriodResetEngine;

use crate::executor::{JobExecutionError, JobHandler};
use crate::trigger::TriggerKind;

/// Closes one tracking period.
#[derive(Debug)]
pub struct PeriodResetJobHandler {
    engine: PeriodResetEngine,
    period: PeriodType,
}

impl PeriodResetJobHandler {
    /// Create a handler for `period`.
    pub fn new(engine: PeriodResetEngine, period: PeriodType) -> Self {
        Self { engine, period }
    }
}

#[async_trait]
impl JobHandler for PeriodResetJobHandler {
    fn trigger(&self) -> TriggerKind {
        match self.period {
            PeriodType::Daily => TriggerKind::DailyReset,
            PeriodType::Weekly => TriggerKind::WeeklyReset,
        }
    }

    async fn execute(&self, ctx: &RunContext) -> Result<Value, JobExecutionError> {
        let report = self.engine.reset_period(self.period, ctx).await?;
        serde_json::to_value(report)
            .map_err(|e| JobExecutionError::Permanent(format!("Unserializable report: {e}")))
    }
}
