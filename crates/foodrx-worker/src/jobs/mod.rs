//! Built-in trigger handlers.

pub mod delivery;
pub mod generation;
pub mod health;
pub mod reset;

use std::sync::Arc;

use foodrx_core::config::AppConfig;
use foodrx_core::result::AppResult;
use foodrx_core::traits::push::PushGateway;
use foodrx_database::Stores;
use foodrx_entity::tracker::PeriodType;
use foodrx_service::{DeliveryEngine, GenerationEngine, GenerationTrigger, PeriodResetEngine};

use crate::executor::JobExecutor;

pub use delivery::DeliveryJobHandler;
pub use generation::GenerationJobHandler;
pub use health::HealthCheckJobHandler;
pub use reset::PeriodResetJobHandler;

/// Build an executor with a handler for every trigger kind.
pub fn pipeline_executor(
    stores: &Stores,
    gateway: Arc<dyn PushGateway>,
    config: &AppConfig,
) -> AppResult<JobExecutor> {
    let generation = GenerationEngine::new(stores, &config.pipeline)?;
    let reset = PeriodResetEngine::new(stores, &config.pipeline)?;
    let delivery = DeliveryEngine::new(stores, gateway, &config.pipeline, &config.push);

    let mut executor = JobExecutor::new();
    executor.register(Arc::new(GenerationJobHandler::new(
        generation.clone(),
        GenerationTrigger::ExpiringIngredients,
    )));
    executor.register(Arc::new(GenerationJobHandler::new(
        generation,
        GenerationTrigger::TrackerReminder,
    )));
    executor.register(Arc::new(DeliveryJobHandler::new(delivery)));
    executor.register(Arc::new(PeriodResetJobHandler::new(
        reset.clone(),
        PeriodType::Daily,
    )));
    executor.register(Arc::new(PeriodResetJobHandler::new(reset, PeriodType::Weekly)));
    executor.register(Arc::new(HealthCheckJobHandler));
    Ok(executor)
}
