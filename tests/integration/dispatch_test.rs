//! Integration tests for the dispatch worker pool and retry handling.

mod helpers;

use std::time::Duration;

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use facet_core::types::PersonId;
use facet_database::memory::AssignmentRecord;
use facet_database::MemoryStore;
use facet_database::store::{NotificationStore, Stores};
use facet_entity::assignment::AssignmentKind;
use facet_entity::dispatch::{DispatchRequest, DispatchStatus, DispatchTask};
use facet_mail::DeliveryError;
use facet_worker::executor::DispatchExecutor;
use facet_worker::{DispatchError, Dispatcher, DispatcherConfig, RetryPolicy};

fn transient() -> Result<(), DeliveryError> {
    Err(DeliveryError::Transient("relay busy".to_string()))
}

#[tokio::test]
async fn test_transient_failures_are_retried_until_success() {
    let app = helpers::TestApp::new();
    let person = app.create_person("Ana", "Ruiz", Some("ana@facet.example.edu"));
    app.transport.push([transient(), transient()]);

    let task_id = app
        .dispatcher
        .submit(DispatchRequest::new(person, "Your term ends soon".to_string(), None))
        .unwrap()
        .task_id();
    let task = app.wait_for_terminal(task_id).await;

    assert_eq!(task.status, DispatchStatus::Succeeded);
    assert_eq!(task.retry_count, 2);
    assert_eq!(task.attempts, 3);
    assert_eq!(app.transport.sent().len(), 3);

    let stored = app.store.list_for_person(person, 10).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].message, "Your term ends soon");
    assert!(!stored[0].is_read);

    let outcome = task.outcome.unwrap();
    assert_eq!(outcome.notification_id, stored[0].id);
    assert_eq!(outcome.email, "ana@facet.example.edu");
}

#[tokio::test]
async fn test_retries_exhausted_marks_failed_without_notification() {
    let app = helpers::TestApp::new();
    let person = app.create_person("Ana", "Ruiz", Some("ana@facet.example.edu"));
    app.transport
        .push([transient(), transient(), transient(), transient()]);

    let task_id = app
        .dispatcher
        .submit(DispatchRequest::new(person, "Reminder".to_string(), None))
        .unwrap()
        .task_id();
    let task = app.wait_for_terminal(task_id).await;

    assert_eq!(task.status, DispatchStatus::Failed);
    assert_eq!(task.attempts, 4);
    assert_eq!(task.retry_count, 3);
    assert_eq!(task.failure.unwrap().code, "DISPATCH_FAILED");
    assert_eq!(app.store.notification_count(), 0);
}

#[tokio::test]
async fn test_missing_email_fails_without_retry() {
    let app = helpers::TestApp::new();
    let person = app.create_person("Luis", "Paz", None);

    let task_id = app
        .dispatcher
        .submit(DispatchRequest::new(person, "Reminder".to_string(), None))
        .unwrap()
        .task_id();
    let task = app.wait_for_terminal(task_id).await;

    assert_eq!(task.status, DispatchStatus::Failed);
    assert_eq!(task.attempts, 1);
    assert_eq!(task.failure.unwrap().code, "NO_EMAIL");
    assert!(app.transport.sent().is_empty());
    assert_eq!(app.store.notification_count(), 0);
}

#[tokio::test]
async fn test_unknown_recipient_fails_without_retry() {
    let app = helpers::TestApp::new();

    let task_id = app
        .dispatcher
        .submit(DispatchRequest::new(PersonId::new(), "Reminder".to_string(), None))
        .unwrap()
        .task_id();
    let task = app.wait_for_terminal(task_id).await;

    assert_eq!(task.status, DispatchStatus::Failed);
    assert_eq!(task.attempts, 1);
    assert_eq!(task.failure.unwrap().code, "RECIPIENT_NOT_FOUND");
}

#[tokio::test]
async fn test_permanent_rejection_fails_without_retry() {
    let app = helpers::TestApp::new();
    let person = app.create_person("Ana", "Ruiz", Some("ana@facet.example.edu"));
    app.transport
        .push([Err(DeliveryError::Permanent("mailbox does not exist".to_string()))]);

    let task_id = app
        .dispatcher
        .submit(DispatchRequest::new(person, "Reminder".to_string(), None))
        .unwrap()
        .task_id();
    let task = app.wait_for_terminal(task_id).await;

    assert_eq!(task.status, DispatchStatus::Failed);
    assert_eq!(task.attempts, 1);
    assert_eq!(task.failure.unwrap().code, "PERMANENT_DELIVERY");
    assert_eq!(app.store.notification_count(), 0);
}

#[tokio::test]
async fn test_default_subject_is_used_when_absent() {
    let app = helpers::TestApp::new();
    let person = app.create_person("Ana", "Ruiz", Some("ana@facet.example.edu"));

    let task_id = app
        .dispatcher
        .submit(DispatchRequest::new(person, "Reminder".to_string(), Some("  ".to_string())))
        .unwrap()
        .task_id();
    app.wait_for_terminal(task_id).await;

    let sent = app.transport.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, "Notification - Appointment renewal");
    assert_eq!(sent[0].from, app.config.mail.from_address);
}

#[tokio::test]
async fn test_empty_message_is_rejected() {
    let app = helpers::TestApp::new();
    let person = app.create_person("Ana", "Ruiz", Some("ana@facet.example.edu"));

    let result = app
        .dispatcher
        .submit(DispatchRequest::new(person, "   ".to_string(), None));

    assert!(result.is_err());
    assert!(app.dispatcher.registry().is_empty());
}

#[tokio::test]
async fn test_cancel_in_progress_task() {
    let app = helpers::TestApp::new();
    let person = app.create_person("Ana", "Ruiz", Some("ana@facet.example.edu"));
    app.transport.set_delay(Duration::from_secs(5));

    let task_id = app
        .dispatcher
        .submit(DispatchRequest::new(person, "Reminder".to_string(), None))
        .unwrap()
        .task_id();

    for _ in 0..200 {
        if app.dispatcher.status(task_id).map(|t| t.status) == Some(DispatchStatus::InProgress) {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    assert!(app.dispatcher.cancel(task_id));
    let task = app.wait_for_terminal(task_id).await;

    assert_eq!(task.status, DispatchStatus::Cancelled);
    assert!(!app.dispatcher.cancel(task_id));
    // The withdrawal runs right after the cancelled send returns.
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(app.store.notification_count(), 0);
}

#[tokio::test]
async fn test_submit_after_shutdown_is_rejected() {
    let app = helpers::TestApp::new();
    let person = app.create_person("Ana", "Ruiz", Some("ana@facet.example.edu"));

    app.dispatcher.shutdown();
    let result = app
        .dispatcher
        .submit(DispatchRequest::new(person, "Reminder".to_string(), None));

    assert!(result.is_err());
}

#[tokio::test]
async fn test_cancelled_token_stops_attempt_before_send() {
    let app = helpers::TestApp::new();
    let person = app.create_person("Ana", "Ruiz", Some("ana@facet.example.edu"));
    let reference = app.store.insert_assignment(
        AssignmentKind::Teaching,
        AssignmentRecord::active(person, "Calculus I", helpers::days_from_today(5)),
    );
    let executor = DispatchExecutor::new(
        Stores::memory(Arc::clone(&app.store)),
        app.transport.clone(),
        app.config.mail.from_address.clone(),
    );

    let cancel = CancellationToken::new();
    cancel.cancel();

    for _ in 0..50 {
        let task = DispatchTask::new(
            DispatchRequest::new(person, "Reminder".to_string(), None).with_origin(reference),
        );
        let result = executor.attempt(&task, &cancel).await;
        assert!(matches!(result, Err(DispatchError::Cancelled)));
    }

    assert!(app.transport.sent().is_empty());
    assert_eq!(app.store.notification_count(), 0);
    assert!(!app.store.get_assignment(reference).unwrap().notified);
}

#[tokio::test]
async fn test_shutdown_cancels_task_waiting_for_retry() {
    let app = helpers::TestApp::with_policy(RetryPolicy::fixed(Duration::from_secs(30), 3));
    let person = app.create_person("Ana", "Ruiz", Some("ana@facet.example.edu"));
    let reference = app.store.insert_assignment(
        AssignmentKind::DepartmentLeadership,
        AssignmentRecord::active(person, "Mathematics", helpers::days_from_today(5)),
    );
    app.transport.push([transient()]);

    let task_id = app
        .dispatcher
        .submit(DispatchRequest::new(person, "Reminder".to_string(), None).with_origin(reference))
        .unwrap()
        .task_id();

    for _ in 0..200 {
        let task = app.dispatcher.status(task_id).unwrap();
        if task.status == DispatchStatus::Pending && task.retry_count == 1 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    let waiting = app.dispatcher.status(task_id).unwrap();
    assert_eq!(waiting.retry_count, 1);
    assert!(waiting.next_attempt_at.is_some());

    app.dispatcher.shutdown();
    let task = app.wait_for_terminal(task_id).await;

    assert_eq!(task.status, DispatchStatus::Cancelled);
    assert_eq!(task.attempts, 1);
    assert!(task.next_attempt_at.is_none());
    assert_eq!(app.transport.sent().len(), 1);
    assert_eq!(app.store.notification_count(), 0);
    assert!(!app.store.get_assignment(reference).unwrap().notified);
    assert!(app.dispatcher.registry().in_flight_for(reference).is_none());
}

#[tokio::test]
async fn test_finished_results_expire_without_cleanup_job() {
    let store = Arc::new(MemoryStore::new());
    let transport = Arc::new(helpers::ScriptedTransport::default());
    let config = DispatcherConfig {
        concurrency: 1,
        from_address: "noreply@facet.example.edu".to_string(),
        retry: RetryPolicy::fixed(Duration::from_millis(10), 0),
        shutdown_grace: Duration::from_secs(1),
        task_result_ttl: Some(Duration::from_millis(100)),
    };
    let (dispatcher, _worker) = Dispatcher::start(config, Stores::memory(store), transport);

    let task_id = dispatcher
        .submit(DispatchRequest::new(PersonId::new(), "Reminder".to_string(), None))
        .unwrap()
        .task_id();

    let mut finished = false;
    for _ in 0..300 {
        match dispatcher.status(task_id) {
            Some(task) => finished |= task.status.is_terminal(),
            None => break,
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    assert!(finished);
    assert!(dispatcher.status(task_id).is_none());
    assert!(dispatcher.registry().is_empty());
    dispatcher.shutdown();
}
