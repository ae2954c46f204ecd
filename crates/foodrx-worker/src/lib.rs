//! Trigger dispatch and scheduled runs for FoodRx Notify.
//!
//! This crate provides:
//! - Trigger kinds naming each pipeline operation
//! - A job executor that dispatches a trigger to its handler
//! - Handlers wrapping the generation, delivery and reset engines
//! - A cron scheduler that runs the periodic triggers

pub mod executor;
pub mod jobs;
pub mod scheduler;
pub mod trigger;

pub use executor::{JobExecutionError, JobExecutor, JobHandler, TriggerOutcome};
pub use jobs::pipeline_executor;
pub use scheduler::CronScheduler;
pub use trigger::TriggerKind;
