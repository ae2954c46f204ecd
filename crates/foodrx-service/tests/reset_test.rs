//! Integration tests for daily and weekly period resets.

mod helpers;

use chrono::{DateTime, Duration, TimeZone, Utc};

use foodrx_core::error::ErrorKind;
use foodrx_core::types::RunContext;
use foodrx_database::memory::Fault;
use foodrx_entity::tracker::PeriodType;

use helpers::{TestPipeline, goal, wednesday_morning};

fn end_of(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 23, 59, 59).unwrap() + Duration::milliseconds(999)
}

#[tokio::test]
async fn test_daily_reset_snapshots_progress_and_zeroes() {
    let pipeline = TestPipeline::new();
    let user = pipeline.store.add_user("Ana", Some("tok-ana")).await;
    let veggies = goal(user, "Vegetables", 5.0, 10.0, false);
    let veggies_id = veggies.id;
    pipeline.store.add_goal(veggies).await;
    pipeline.store.add_goal(goal(user, "Fruit", 0.0, 3.0, false)).await;
    pipeline.store.add_goal(goal(user, "Fish", 2.0, 3.0, true)).await;

    let report = pipeline
        .reset()
        .reset_period_at(PeriodType::Daily, &RunContext::unbounded(), wednesday_morning())
        .await
        .unwrap();

    assert_eq!(report.users_processed, 1);
    assert_eq!(report.snapshots_written, 1);
    assert_eq!(report.goals_reset, 2);

    let progress = pipeline.store.progress().await;
    assert_eq!(progress.len(), 1);
    assert_eq!(progress[0].tracker_id, veggies_id);
    assert_eq!(progress[0].achieved_value, 5.0);
    assert_eq!(progress[0].target_value, 10.0);
    assert_eq!(progress[0].period_type, PeriodType::Daily);
    assert_eq!(progress[0].progress_date, end_of(2024, 4, 30));

    let goals = pipeline.store.goals().await;
    for g in goals.iter().filter(|g| !g.is_weekly_goal) {
        assert_eq!(g.current_value, 0.0);
        assert!(g.last_updated.is_some());
    }
    let weekly = goals.iter().find(|g| g.is_weekly_goal).unwrap();
    assert_eq!(weekly.current_value, 2.0);
}

#[tokio::test]
async fn test_zero_progress_writes_no_snapshot() {
    let pipeline = TestPipeline::new();
    let user = pipeline.store.add_user("Ben", None).await;
    pipeline.store.add_goal(goal(user, "Water", 0.0, 8.0, false)).await;

    let report = pipeline
        .reset()
        .reset_period_at(PeriodType::Daily, &RunContext::unbounded(), wednesday_morning())
        .await
        .unwrap();

    assert_eq!(report.snapshots_written, 0);
    assert_eq!(report.goals_reset, 1);
    assert!(pipeline.store.progress().await.is_empty());
}

#[tokio::test]
async fn test_weekly_reset_closes_previous_week() {
    let pipeline = TestPipeline::new();
    let user = pipeline.store.add_user("Cam", None).await;
    pipeline.store.add_goal(goal(user, "Legumes", 4.0, 5.0, true)).await;
    pipeline.store.add_goal(goal(user, "Water", 6.0, 8.0, false)).await;
    // Sunday just after midnight.
    let now = Utc.with_ymd_and_hms(2024, 5, 5, 0, 0, 30).unwrap();

    let report = pipeline
        .reset()
        .reset_period_at(PeriodType::Weekly, &RunContext::unbounded(), now)
        .await
        .unwrap();

    assert_eq!(report.snapshots_written, 1);
    assert_eq!(report.goals_reset, 1);
    let progress = pipeline.store.progress().await;
    assert_eq!(progress[0].period_type, PeriodType::Weekly);
    assert_eq!(progress[0].progress_date, end_of(2024, 5, 4));

    let daily = pipeline
        .store
        .goals()
        .await
        .into_iter()
        .find(|g| !g.is_weekly_goal)
        .unwrap();
    assert_eq!(daily.current_value, 6.0);
}

#[tokio::test]
async fn test_snapshot_failure_still_resets() {
    let pipeline = TestPipeline::new();
    let user = pipeline.store.add_user("Dee", None).await;
    pipeline.store.add_goal(goal(user, "Protein", 50.0, 60.0, false)).await;
    pipeline.store.inject(Fault::InsertProgress(user)).await;

    let report = pipeline
        .reset()
        .reset_period_at(PeriodType::Daily, &RunContext::unbounded(), wednesday_morning())
        .await
        .unwrap();

    assert_eq!(report.snapshot_failures, 1);
    assert_eq!(report.snapshots_written, 0);
    assert_eq!(report.goals_reset, 1);
    assert!(pipeline.store.progress().await.is_empty());
    assert_eq!(pipeline.store.goals().await[0].current_value, 0.0);
}

#[tokio::test]
async fn test_reset_failure_for_one_user_continues() {
    let pipeline = TestPipeline::new();
    let broken = pipeline.store.add_user("Eli", None).await;
    let healthy = pipeline.store.add_user("Fay", None).await;
    pipeline.store.add_goal(goal(broken, "Water", 3.0, 8.0, false)).await;
    pipeline.store.add_goal(goal(healthy, "Water", 4.0, 8.0, false)).await;
    pipeline.store.inject(Fault::ResetGoals(broken)).await;

    let report = pipeline
        .reset()
        .reset_period_at(PeriodType::Daily, &RunContext::unbounded(), wednesday_morning())
        .await
        .unwrap();

    assert_eq!(report.users_processed, 2);
    assert_eq!(report.reset_failures, 1);
    assert_eq!(report.snapshots_written, 2);
    assert_eq!(report.goals_reset, 1);

    let goals = pipeline.store.goals().await;
    let broken_goal = goals.iter().find(|g| g.user_id == broken).unwrap();
    let healthy_goal = goals.iter().find(|g| g.user_id == healthy).unwrap();
    assert_eq!(broken_goal.current_value, 3.0);
    assert_eq!(healthy_goal.current_value, 0.0);
}

#[tokio::test]
async fn test_users_without_goals_are_counted() {
    let pipeline = TestPipeline::with_batch_size(2);
    for i in 0..3 {
        pipeline.store.add_user(&format!("user-{i}"), None).await;
    }

    let report = pipeline
        .reset()
        .reset_period_at(PeriodType::Daily, &RunContext::unbounded(), wednesday_morning())
        .await
        .unwrap();

    assert_eq!(report.users_processed, 3);
    assert_eq!(report.goals_reset, 0);
}

#[tokio::test]
async fn test_user_page_failure_is_fatal() {
    let pipeline = TestPipeline::new();
    pipeline.store.inject(Fault::UserPage).await;

    let err = pipeline
        .reset()
        .reset_period_at(PeriodType::Daily, &RunContext::unbounded(), wednesday_morning())
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Database);
}
