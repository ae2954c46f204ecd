//! Job executor: dispatches triggers to registered handlers.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info};

use foodrx_core::error::AppError;
use foodrx_core::types::RunContext;

use crate::trigger::TriggerKind;

/// Trait for trigger handler implementations.
#[async_trait]
pub trait JobHandler: Send + Sync + std::fmt::Debug {
    /// The trigger this handler runs.
    fn trigger(&self) -> TriggerKind;

    /// Run the trigger and return its report.
    async fn execute(&self, ctx: &RunContext) -> Result<Value, JobExecutionError>;
}

/// Error from job execution.
#[derive(Debug, thiserror::Error)]
pub enum JobExecutionError {
    /// Permanent failure, do not retry.
    #[error("Permanent job failure: {0}")]
    Permanent(String),

    /// Transient failure, may retry.
    #[error("Transient job failure: {0}")]
    Transient(String),

    /// Engine error.
    #[error("Internal error: {0}")]
    Internal(#[from] AppError),
}

impl JobExecutionError {
    /// Whether running the trigger again may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Permanent(_) => false,
            Self::Transient(_) => true,
            Self::Internal(e) => e.is_retryable(),
        }
    }
}

impl From<JobExecutionError> for AppError {
    fn from(err: JobExecutionError) -> Self {
        match err {
            JobExecutionError::Internal(e) => e,
            JobExecutionError::Permanent(msg) => AppError::validation(msg),
            JobExecutionError::Transient(msg) => AppError::service_unavailable(msg),
        }
    }
}

/// Structured result of one trigger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerOutcome {
    /// `success` for a finished run.
    pub status: String,
    /// The trigger that ran.
    pub trigger: TriggerKind,
    /// The engine report.
    pub report: Value,
}

impl TriggerOutcome {
    /// A finished run with its report.
    pub fn success(trigger: TriggerKind, report: Value) -> Self {
        Self {
            status: "success".to_string(),
            trigger,
            report,
        }
    }
}

/// Dispatches triggers to the appropriate handler.
#[derive(Debug)]
pub struct JobExecutor {
    handlers: HashMap<TriggerKind, Arc<dyn JobHandler>>,
}

impl JobExecutor {
    /// Create an executor with no handlers.
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Register a handler, replacing any previous one for its trigger.
    pub fn register(&mut self, handler: Arc<dyn JobHandler>) {
        let trigger = handler.trigger();
        info!(trigger = %trigger, "Registered job handler");
        self.handlers.insert(trigger, handler);
    }

    /// Run `trigger` under `ctx`.
    pub async fn execute(
        &self,
        trigger: TriggerKind,
        ctx: &RunContext,
    ) -> Result<TriggerOutcome, JobExecutionError> {
        let handler = self.handlers.get(&trigger).ok_or_else(|| {
            JobExecutionError::Permanent(format!("No handler registered for trigger '{trigger}'"))
        })?;

        info!(trigger = %trigger, "Executing trigger");
        match handler.execute(ctx).await {
            Ok(report) => {
                info!(trigger = %trigger, "Trigger finished");
                Ok(TriggerOutcome::success(trigger, report))
            }
            Err(e) => {
                error!(trigger = %trigger, error = %e, retryable = e.is_retryable(), "Trigger failed");
                Err(e)
            }
        }
    }

    /// Check if a handler is registered for a trigger.
    pub fn has_handler(&self, trigger: TriggerKind) -> bool {
        self.handlers.contains_key(&trigger)
    }

    /// The registered triggers.
    pub fn registered_triggers(&self) -> Vec<TriggerKind> {
        let mut triggers: Vec<TriggerKind> = self.handlers.keys().copied().collect();
        triggers.sort_by_key(|t| t.as_str());
        triggers
    }
}

impl Default for JobExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::HealthCheckJobHandler;
    use foodrx_core::error::ErrorKind;

    #[tokio::test]
    async fn test_unregistered_trigger_is_permanent() {
        let executor = JobExecutor::new();
        let err = executor
            .execute(TriggerKind::DailyReset, &RunContext::unbounded())
            .await
            .unwrap_err();
        assert!(matches!(err, JobExecutionError::Permanent(_)));
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn test_dispatches_to_handler() {
        let mut executor = JobExecutor::new();
        executor.register(Arc::new(HealthCheckJobHandler));
        assert!(executor.has_handler(TriggerKind::Test));

        let outcome = executor
            .execute(TriggerKind::Test, &RunContext::unbounded())
            .await
            .unwrap();
        assert_eq!(outcome.status, "success");
        assert_eq!(outcome.trigger, TriggerKind::Test);
    }

    #[test]
    fn test_into_app_error() {
        let err: AppError = JobExecutionError::Permanent("bad".into()).into();
        assert_eq!(err.kind, ErrorKind::Validation);
        let err: AppError = JobExecutionError::Internal(AppError::cancelled("stop")).into();
        assert_eq!(err.kind, ErrorKind::Cancelled);
    }
}
