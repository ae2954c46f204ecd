//! Integration tests for pending notification delivery.

mod helpers;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use foodrx_core::config::PushConfig;
use foodrx_core::error::ErrorKind;
use foodrx_core::traits::push::{DeliveryId, PushError, PushGateway, PushMessage};
use foodrx_core::types::{NotificationId, RunContext, UserId};
use foodrx_database::{MemoryStore, NotificationStore};
use foodrx_database::memory::Fault;
use foodrx_entity::notification::{AnalyticsAction, NewNotification, NotificationKind};
use foodrx_service::{DeliveryEngine, DeliveryReport};

use helpers::TestPipeline;

async fn queue(pipeline: &TestPipeline, user_id: UserId, title: &str) -> NotificationId {
    let new = NewNotification::new(user_id, NotificationKind::Admin, title, "body");
    pipeline.store.insert(new, Utc::now()).await.unwrap().id
}

#[tokio::test]
async fn test_delivers_and_marks_sent() {
    let pipeline = TestPipeline::new();
    let user = pipeline.store.add_user("Ana", Some("tok-ana")).await;
    let first = queue(&pipeline, user, "one").await;
    let second = queue(&pipeline, user, "two").await;

    let report = pipeline
        .delivery()
        .deliver_pending(&RunContext::unbounded())
        .await
        .unwrap();

    assert_eq!(report.total_pending, 2);
    assert_eq!(report.processed, 2);
    assert_eq!(report.sent, 2);
    assert_eq!(report.failed, 0);
    assert_eq!(report.batches, 1);

    for id in [first, second] {
        let stored = pipeline.store.notification(id).await.unwrap();
        assert!(stored.sent_at.is_some());
    }

    let sent = pipeline.gateway.sent();
    assert_eq!(sent.len(), 2);
    assert!(sent.iter().all(|m| m.token == "tok-ana"));
    assert!(
        sent.iter()
            .any(|m| m.data.get("notificationId") == Some(&first.to_string()))
    );
    assert!(sent.iter().all(|m| m.data.get("type").map(String::as_str) == Some("admin")));

    let analytics = pipeline.store.analytics().await;
    assert_eq!(analytics.len(), 2);
    assert!(analytics.iter().all(|e| e.action == AnalyticsAction::Sent));
    assert!(analytics.iter().all(|e| e.metadata["messageId"].is_string()));
}

#[tokio::test]
async fn test_missing_token_is_skipped_without_send() {
    let pipeline = TestPipeline::new();
    let no_token = pipeline.store.add_user("Ben", None).await;
    let blank_token = pipeline.store.add_user("Cam", Some("   ")).await;
    let a = queue(&pipeline, no_token, "hello").await;
    let b = queue(&pipeline, blank_token, "hello").await;
    let orphan = queue(&pipeline, UserId::new(), "hello").await;

    let report = pipeline
        .delivery()
        .deliver_pending(&RunContext::unbounded())
        .await
        .unwrap();

    assert_eq!(report.skipped_no_token, 3);
    assert_eq!(report.sent, 0);
    assert_eq!(report.failed, 0);
    assert_eq!(pipeline.gateway.attempts(), 0);
    for id in [a, b, orphan] {
        assert!(pipeline.store.notification(id).await.unwrap().is_pending());
    }
    assert!(pipeline.store.analytics().await.is_empty());
}

#[tokio::test]
async fn test_large_queue_is_drained_in_batches() {
    let pipeline = TestPipeline::with_batch_size(1000);
    let user = pipeline.store.add_user("Dee", Some("tok-dee")).await;
    for i in 0..2500 {
        queue(&pipeline, user, &format!("n-{i}")).await;
    }

    let report = pipeline
        .delivery()
        .deliver_pending(&RunContext::unbounded())
        .await
        .unwrap();

    assert_eq!(report.total_pending, 2500);
    assert_eq!(report.sent, 2500);
    assert_eq!(report.batches, 3);
    assert_eq!(pipeline.store.pending_fetches().await, 3);
    assert_eq!(pipeline.store.count_pending().await.unwrap(), 0);
}

#[tokio::test]
async fn test_failed_items_are_not_refetched_in_same_run() {
    let pipeline = TestPipeline::with_batch_size(2);
    let user = pipeline.store.add_user("Eli", Some("tok-bad")).await;
    for i in 0..3 {
        queue(&pipeline, user, &format!("n-{i}")).await;
    }
    pipeline
        .gateway
        .fail_token("tok-bad", PushError::InvalidToken("unregistered".into()));

    let report = pipeline
        .delivery()
        .deliver_pending(&RunContext::unbounded())
        .await
        .unwrap();

    assert_eq!(report.failed, 3);
    assert_eq!(report.processed, 3);
    assert_eq!(report.batches, 2);
    assert_eq!(pipeline.gateway.attempts(), 3);
    assert_eq!(pipeline.store.pending_fetches().await, 2);
    assert_eq!(pipeline.store.count_pending().await.unwrap(), 3);
}

#[tokio::test]
async fn test_send_failure_records_error_code() {
    let pipeline = TestPipeline::new();
    let good = pipeline.store.add_user("Fay", Some("tok-good")).await;
    let bad = pipeline.store.add_user("Gus", Some("tok-bad")).await;
    queue(&pipeline, good, "ok").await;
    let failing = queue(&pipeline, bad, "nope").await;
    pipeline
        .gateway
        .fail_token("tok-bad", PushError::Unavailable("503".into()));

    let report = pipeline
        .delivery()
        .deliver_pending(&RunContext::unbounded())
        .await
        .unwrap();

    assert_eq!(report.sent, 1);
    assert_eq!(report.failed, 1);
    assert!(pipeline.store.notification(failing).await.unwrap().is_pending());

    let failed: Vec<_> = pipeline
        .store
        .analytics()
        .await
        .into_iter()
        .filter(|e| e.action == AnalyticsAction::Failed)
        .collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].notification_id, failing);
    assert_eq!(failed[0].metadata["code"], "unavailable");
}

#[tokio::test]
async fn test_commit_failure_counts_as_failed() {
    let pipeline = TestPipeline::new();
    let user = pipeline.store.add_user("Hal", Some("tok-hal")).await;
    let id = queue(&pipeline, user, "hello").await;
    pipeline.store.inject(Fault::MarkSent(id)).await;

    let report = pipeline
        .delivery()
        .deliver_pending(&RunContext::unbounded())
        .await
        .unwrap();

    assert_eq!(report.failed, 1);
    assert_eq!(report.sent, 0);
    assert_eq!(pipeline.gateway.attempts(), 1);
    assert!(pipeline.store.notification(id).await.unwrap().is_pending());
    let analytics = pipeline.store.analytics().await;
    assert_eq!(analytics[0].action, AnalyticsAction::Failed);
    assert_eq!(analytics[0].metadata["code"], "commit");
}

#[tokio::test]
async fn test_contact_lookup_failure_counts_as_failed() {
    let pipeline = TestPipeline::new();
    let broken = pipeline.store.add_user("Ivy", Some("tok-ivy")).await;
    let healthy = pipeline.store.add_user("Jo", Some("tok-jo")).await;
    queue(&pipeline, broken, "a").await;
    queue(&pipeline, healthy, "b").await;
    pipeline.store.inject(Fault::Contact(broken)).await;

    let report = pipeline
        .delivery()
        .deliver_pending(&RunContext::unbounded())
        .await
        .unwrap();

    assert_eq!(report.failed, 1);
    assert_eq!(report.sent, 1);
}

#[tokio::test]
async fn test_analytics_failure_does_not_change_outcome() {
    let pipeline = TestPipeline::new();
    let user = pipeline.store.add_user("Kim", Some("tok-kim")).await;
    let id = queue(&pipeline, user, "hello").await;
    pipeline.store.inject(Fault::Analytics).await;

    let report = pipeline
        .delivery()
        .deliver_pending(&RunContext::unbounded())
        .await
        .unwrap();

    assert_eq!(report.sent, 1);
    assert!(pipeline.store.notification(id).await.unwrap().sent_at.is_some());
}

#[tokio::test]
async fn test_empty_queue() {
    let pipeline = TestPipeline::new();

    let report = pipeline
        .delivery()
        .deliver_pending(&RunContext::unbounded())
        .await
        .unwrap();

    assert_eq!(report, DeliveryReport::default());
    assert_eq!(pipeline.store.pending_fetches().await, 0);
}

#[tokio::test]
async fn test_count_failure_is_fatal() {
    let pipeline = TestPipeline::new();
    pipeline.store.inject(Fault::CountPending).await;

    let err = pipeline
        .delivery()
        .deliver_pending(&RunContext::unbounded())
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Database);
}

#[tokio::test]
async fn test_cancelled_run_sends_nothing() {
    let pipeline = TestPipeline::new();
    let user = pipeline.store.add_user("Lou", Some("tok-lou")).await;
    queue(&pipeline, user, "hello").await;
    let ctx = RunContext::unbounded();
    ctx.cancel_token().cancel();

    let err = pipeline.delivery().deliver_pending(&ctx).await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::Cancelled);
    assert_eq!(pipeline.gateway.attempts(), 0);
}

#[tokio::test]
async fn test_concurrent_sends_within_batch() {
    let mut config = foodrx_core::config::PipelineConfig::default();
    config.delivery_concurrency = 8;
    let pipeline = TestPipeline::with_config(config);
    let user = pipeline.store.add_user("Max", Some("tok-max")).await;
    for i in 0..20 {
        queue(&pipeline, user, &format!("n-{i}")).await;
    }

    let report = pipeline
        .delivery()
        .deliver_pending(&RunContext::unbounded())
        .await
        .unwrap();

    assert_eq!(report.sent, 20);
    assert_eq!(pipeline.gateway.sent().len(), 20);
}

/// Gateway that lets another pass commit the notification while the push
/// is in flight.
#[derive(Debug)]
struct RacingGateway {
    store: Arc<MemoryStore>,
    id: NotificationId,
}

#[async_trait]
impl PushGateway for RacingGateway {
    fn provider_type(&self) -> &str {
        "racing"
    }

    async fn send(&self, _message: &PushMessage) -> Result<DeliveryId, PushError> {
        self.store
            .mark_sent(self.id, Utc::now())
            .await
            .map_err(|e| PushError::Other(e.to_string()))?;
        Ok(DeliveryId("racing/1".to_string()))
    }
}

#[tokio::test]
async fn test_already_marked_by_another_pass_counts_as_sent() {
    let pipeline = TestPipeline::new();
    let user = pipeline.store.add_user("Ana", Some("tok-ana")).await;
    let id = queue(&pipeline, user, "raced").await;
    let gateway: Arc<dyn PushGateway> = Arc::new(RacingGateway {
        store: pipeline.store.clone(),
        id,
    });
    let engine = DeliveryEngine::new(
        &pipeline.stores,
        gateway,
        &pipeline.config,
        &PushConfig::default(),
    );

    let report = engine
        .deliver_pending(&RunContext::unbounded())
        .await
        .unwrap();

    assert_eq!(report.sent, 1);
    assert_eq!(report.failed, 0);
    assert!(pipeline.store.notification(id).await.unwrap().sent_at.is_some());
    let analytics = pipeline.store.analytics().await;
    assert_eq!(analytics.len(), 1);
    assert_eq!(analytics[0].action, AnalyticsAction::Sent);
}
