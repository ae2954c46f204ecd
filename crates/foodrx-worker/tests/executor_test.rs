//! Integration tests for trigger dispatch against the in-memory store.

use std::sync::Arc;

use foodrx_core::config::{
    AppConfig, DatabaseConfig, LoggingConfig, PipelineConfig, PushConfig, SchedulerConfig,
};
use foodrx_core::traits::push::PushGateway;
use foodrx_core::types::RunContext;
use foodrx_database::{MemoryStore, Stores};
use foodrx_push::MockPushGateway;
use foodrx_worker::{TriggerKind, pipeline_executor};

fn config() -> AppConfig {
    AppConfig {
        database: DatabaseConfig {
            url: "postgres://localhost/foodrx_test".to_string(),
            max_connections: 1,
            min_connections: 0,
            connect_timeout_seconds: 1,
            idle_timeout_seconds: 1,
        },
        push: PushConfig::default(),
        pipeline: PipelineConfig::default(),
        scheduler: SchedulerConfig::default(),
        logging: LoggingConfig::default(),
    }
}

#[tokio::test]
async fn test_every_trigger_has_a_handler() {
    let store = Arc::new(MemoryStore::new());
    let gateway: Arc<dyn PushGateway> = Arc::new(MockPushGateway::new());
    let executor = pipeline_executor(&Stores::memory(store), gateway, &config()).unwrap();

    for kind in TriggerKind::ALL {
        assert!(executor.has_handler(kind), "missing handler for {kind}");
    }
}

#[tokio::test]
async fn test_reminder_then_delivery() {
    let store = Arc::new(MemoryStore::new());
    store.add_user("Ana", Some("tok-ana")).await;
    let gateway = Arc::new(MockPushGateway::new());
    let dyn_gateway: Arc<dyn PushGateway> = gateway.clone();
    let executor =
        pipeline_executor(&Stores::memory(store.clone()), dyn_gateway, &config()).unwrap();
    let ctx = RunContext::unbounded();

    let generated = executor
        .execute(TriggerKind::TrackerReminder, &ctx)
        .await
        .unwrap();
    assert_eq!(generated.status, "success");
    assert_eq!(generated.report["notifications_created"], 1);

    let delivered = executor
        .execute(TriggerKind::ScheduledDelivery, &ctx)
        .await
        .unwrap();
    assert_eq!(delivered.trigger, TriggerKind::ScheduledDelivery);
    assert_eq!(delivered.report["sent"], 1);
    assert_eq!(gateway.sent().len(), 1);
}

#[tokio::test]
async fn test_reset_reports_counts() {
    let store = Arc::new(MemoryStore::new());
    store.add_user("Ben", None).await;
    let gateway: Arc<dyn PushGateway> = Arc::new(MockPushGateway::new());
    let executor = pipeline_executor(&Stores::memory(store), gateway, &config()).unwrap();

    let outcome = executor
        .execute(TriggerKind::WeeklyReset, &RunContext::unbounded())
        .await
        .unwrap();

    assert_eq!(outcome.report["users_processed"], 1);
    assert_eq!(outcome.report["goals_reset"], 0);
}

#[tokio::test]
async fn test_outcome_serializes_with_wire_names() {
    let store = Arc::new(MemoryStore::new());
    let gateway: Arc<dyn PushGateway> = Arc::new(MockPushGateway::new());
    let executor = pipeline_executor(&Stores::memory(store), gateway, &config()).unwrap();

    let outcome = executor
        .execute(TriggerKind::Test, &RunContext::unbounded())
        .await
        .unwrap();
    let json = serde_json::to_value(&outcome).unwrap();

    assert_eq!(json["status"], "success");
    assert_eq!(json["trigger"], "test");
}
