//! Shared fixtures for pipeline tests.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

use foodrx_core::config::{PipelineConfig, PushConfig};
use foodrx_core::traits::push::PushGateway;
use foodrx_core::types::{TrackerId, UserId};
use foodrx_database::{MemoryStore, Stores};
use foodrx_entity::tracker::TrackerGoal;
use foodrx_push::MockPushGateway;
use foodrx_service::{
    AdminNotificationService, DeliveryEngine, GenerationEngine, PeriodResetEngine,
};

/// In-memory pipeline with a recording gateway.
pub struct TestPipeline {
    pub store: Arc<MemoryStore>,
    pub stores: Stores,
    pub gateway: Arc<MockPushGateway>,
    pub config: PipelineConfig,
}

impl TestPipeline {
    pub fn new() -> Self {
        Self::with_config(PipelineConfig::default())
    }

    pub fn with_batch_size(batch_size: u32) -> Self {
        Self::with_config(PipelineConfig {
            batch_size,
            ..PipelineConfig::default()
        })
    }

    pub fn with_config(config: PipelineConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            stores: Stores::memory(store.clone()),
            store,
            gateway: Arc::new(MockPushGateway::new()),
            config,
        }
    }

    pub fn generation(&self) -> GenerationEngine {
        GenerationEngine::new(&self.stores, &self.config).unwrap()
    }

    pub fn delivery(&self) -> DeliveryEngine {
        let gateway: Arc<dyn PushGateway> = self.gateway.clone();
        DeliveryEngine::new(&self.stores, gateway, &self.config, &PushConfig::default())
    }

    pub fn reset(&self) -> PeriodResetEngine {
        PeriodResetEngine::new(&self.stores, &self.config).unwrap()
    }

    pub fn admin(&self) -> AdminNotificationService {
        AdminNotificationService::new(&self.stores)
    }
}

/// Wednesday 2024-05-01 09:00 UTC.
pub fn wednesday_morning() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()
}

pub fn goal(user_id: UserId, name: &str, current: f64, target: f64, weekly: bool) -> TrackerGoal {
    TrackerGoal {
        id: TrackerId::new(),
        user_id,
        name: name.to_string(),
        category: "nutrition".to_string(),
        goal_value: target,
        current_value: current,
        is_weekly_goal: weekly,
        unit: Some("servings".to_string()),
        diet_type: Some("balanced".to_string()),
        last_updated: None,
    }
}
