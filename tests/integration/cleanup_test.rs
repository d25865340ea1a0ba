//! Integration tests for notification retention cleanup.

mod helpers;

use std::sync::Arc;
use std::time::Duration;

use chrono::{Duration as ChronoDuration, Utc};

use facet_core::config::schedule::RetentionConfig;
use facet_core::error::ErrorKind;
use facet_database::store::NotificationStore;
use facet_entity::dispatch::DispatchRequest;
use facet_worker::jobs::NotificationCleanupJob;

#[tokio::test]
async fn test_cleanup_deletes_only_past_retention() {
    let app = helpers::TestApp::new();
    let person = app.create_person("Ana", "Ruiz", Some("ana@facet.example.edu"));
    let now = Utc::now();

    let expired = app
        .store
        .insert_notification_at(person, "old", now - ChronoDuration::days(180));
    let kept = app
        .store
        .insert_notification_at(person, "recent", now - ChronoDuration::days(179));
    app.store.insert_notification_at(person, "today", now);

    let report = app.cleanup.run_at(now).await.unwrap();

    assert_eq!(report.deleted, 1);
    assert_eq!(report.cutoff, now - ChronoDuration::days(180));
    assert!(app.store.find_by_id(expired.id).await.unwrap().is_none());
    assert!(app.store.find_by_id(kept.id).await.unwrap().is_some());
    assert_eq!(app.store.notification_count(), 2);
}

#[tokio::test]
async fn test_cleanup_on_empty_store() {
    let app = helpers::TestApp::new();

    let report = app.cleanup.run().await.unwrap();

    assert_eq!(report.deleted, 0);
    assert_eq!(report.tasks_purged, 0);
}

#[tokio::test]
async fn test_cleanup_purges_finished_task_results() {
    let app = helpers::TestApp::new();
    let person = app.create_person("Ana", "Ruiz", Some("ana@facet.example.edu"));

    let task_id = app
        .dispatcher
        .submit(DispatchRequest::new(person, "Reminder".to_string(), None))
        .unwrap()
        .task_id();
    app.wait_for_terminal(task_id).await;

    let job = NotificationCleanupJob::new(
        Arc::clone(&app.store) as Arc<dyn NotificationStore>,
        &app.config.retention,
    )
    .with_task_results(app.dispatcher.registry(), Duration::from_secs(60));

    let early = job.run_at(Utc::now()).await.unwrap();
    assert_eq!(early.tasks_purged, 0);
    assert!(app.dispatcher.status(task_id).is_some());

    let later = job
        .run_at(Utc::now() + ChronoDuration::minutes(2))
        .await
        .unwrap();
    assert_eq!(later.tasks_purged, 1);
    assert!(app.dispatcher.status(task_id).is_none());
    // The delivered notification is recent and survives.
    assert_eq!(app.store.notification_count(), 1);
}

#[tokio::test]
async fn test_out_of_range_retention_is_an_error() {
    let app = helpers::TestApp::new();
    let person = app.create_person("Ana", "Ruiz", Some("ana@facet.example.edu"));
    app.store
        .insert_notification_at(person, "old", Utc::now() - ChronoDuration::days(400));

    let config = RetentionConfig {
        notification_retention_days: u32::MAX,
        ..RetentionConfig::default()
    };
    let job = NotificationCleanupJob::new(
        Arc::clone(&app.store) as Arc<dyn NotificationStore>,
        &config,
    );

    let err = job.run().await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Configuration);
    assert_eq!(app.store.notification_count(), 1);
}
