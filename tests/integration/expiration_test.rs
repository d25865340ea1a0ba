//! Integration tests for the expiration scanner.

mod helpers;

use std::time::Duration;

use chrono::Utc;

use facet_database::memory::AssignmentRecord;
use facet_entity::assignment::{AssignmentKind, AssignmentStatus};
use facet_entity::dispatch::DispatchStatus;
use facet_mail::DeliveryError;
use facet_worker::templates::{self, LEADERSHIP_SUBJECT, TEACHING_SUBJECT};

#[tokio::test]
async fn test_expiring_teaching_term_is_notified_once() {
    let app = helpers::TestApp::new();
    let person = app.create_person("Ana", "Ruiz", Some("ana@facet.example.edu"));
    let reference = app.store.insert_assignment(
        AssignmentKind::Teaching,
        AssignmentRecord::active(person, "Calculus I", helpers::days_from_today(29)),
    );

    let report = app.scanner.run().await;
    assert_eq!(report.scheduled, 1);
    assert_eq!(report.by_kind.get(&AssignmentKind::Teaching), Some(&1));
    app.wait_for_idle().await;

    assert!(app.store.get_assignment(reference).unwrap().notified);
    assert_eq!(app.store.notification_count(), 1);

    let sent = app.transport.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "ana@facet.example.edu");
    assert_eq!(sent[0].subject, TEACHING_SUBJECT);
    assert!(sent[0].body.contains("Ana Ruiz"));
    assert!(sent[0].body.contains("Calculus I"));

    let second = app.scanner.run().await;
    assert_eq!(second.scheduled, 0);
    app.wait_for_idle().await;
    assert_eq!(app.store.notification_count(), 1);
    assert_eq!(app.transport.sent().len(), 1);
}

#[tokio::test]
async fn test_overlapping_scans_do_not_duplicate_in_flight_reminders() {
    let app = helpers::TestApp::new();
    let person = app.create_person("Ana", "Ruiz", Some("ana@facet.example.edu"));
    app.store.insert_assignment(
        AssignmentKind::DepartmentLeadership,
        AssignmentRecord::active(person, "Mathematics", helpers::days_from_today(10)),
    );
    app.transport.set_delay(Duration::from_millis(200));

    let first = app.scanner.run().await;
    let second = app.scanner.run().await;

    assert_eq!(first.scheduled, 1);
    assert_eq!(second.scheduled, 0);
    assert_eq!(second.skipped_in_flight, 1);

    app.wait_for_idle().await;
    assert_eq!(app.store.notification_count(), 1);
    assert_eq!(app.transport.sent()[0].subject, LEADERSHIP_SUBJECT);
}

#[tokio::test]
async fn test_window_bounds_are_inclusive() {
    let app = helpers::TestApp::new();
    let person = app.create_person("Ana", "Ruiz", Some("ana@facet.example.edu"));

    let today = app.store.insert_assignment(
        AssignmentKind::Teaching,
        AssignmentRecord::active(person, "Algebra", helpers::days_from_today(0)),
    );
    let last_day = app.store.insert_assignment(
        AssignmentKind::Teaching,
        AssignmentRecord::active(person, "Geometry", helpers::days_from_today(30)),
    );
    let too_late = app.store.insert_assignment(
        AssignmentKind::Teaching,
        AssignmentRecord::active(person, "Topology", helpers::days_from_today(31)),
    );
    let already_ended = app.store.insert_assignment(
        AssignmentKind::Teaching,
        AssignmentRecord::active(person, "Logic", helpers::days_from_today(-1)),
    );

    let due: Vec<_> = app
        .scanner
        .preview(Utc::now())
        .await
        .unwrap()
        .into_iter()
        .map(|a| a.reference)
        .collect();

    assert_eq!(due, vec![today, last_day]);
    assert!(!due.contains(&too_late));
    assert!(!due.contains(&already_ended));
}

#[tokio::test]
async fn test_inactive_notified_and_open_ended_terms_are_skipped() {
    let app = helpers::TestApp::new();
    let person = app.create_person("Ana", "Ruiz", Some("ana@facet.example.edu"));

    let mut inactive = AssignmentRecord::active(person, "Physics", helpers::days_from_today(5));
    inactive.status = AssignmentStatus::Inactive;
    app.store
        .insert_assignment(AssignmentKind::Teaching, inactive);

    let mut notified = AssignmentRecord::active(person, "Chemistry", helpers::days_from_today(5));
    notified.notified = true;
    app.store
        .insert_assignment(AssignmentKind::Teaching, notified);

    let mut open_ended = AssignmentRecord::active(person, "Biology", helpers::days_from_today(5));
    open_ended.end_date = None;
    app.store
        .insert_assignment(AssignmentKind::Teaching, open_ended);

    let report = app.scanner.run().await;

    assert_eq!(report.scheduled, 0);
    assert_eq!(report.failed, 0);
    assert!(app.transport.sent().is_empty());
}

#[tokio::test]
async fn test_failed_reminder_is_retried_by_next_scan() {
    let app = helpers::TestApp::new();
    let person = app.create_person("Luis", "Paz", None);
    let reference = app.store.insert_assignment(
        AssignmentKind::DepartmentLeadership,
        AssignmentRecord::active(person, "Physics", helpers::days_from_today(3)),
    );

    assert_eq!(app.scanner.run().await.scheduled, 1);
    app.wait_for_idle().await;
    assert!(!app.store.get_assignment(reference).unwrap().notified);
    assert_eq!(app.store.notification_count(), 0);

    assert_eq!(app.scanner.run().await.scheduled, 1);
}

#[tokio::test]
async fn test_both_kinds_are_scanned() {
    let app = helpers::TestApp::new();
    let ana = app.create_person("Ana", "Ruiz", Some("ana@facet.example.edu"));
    let luis = app.create_person("Luis", "Paz", Some("luis@facet.example.edu"));
    app.store.insert_assignment(
        AssignmentKind::DepartmentLeadership,
        AssignmentRecord::active(ana, "Mathematics", helpers::days_from_today(7)),
    );
    app.store.insert_assignment(
        AssignmentKind::Teaching,
        AssignmentRecord::active(luis, "Statistics", helpers::days_from_today(14)),
    );

    let report = app.scanner.run().await;
    app.wait_for_idle().await;

    assert_eq!(report.scheduled, 2);
    assert_eq!(report.by_kind.get(&AssignmentKind::DepartmentLeadership), Some(&1));
    assert_eq!(report.by_kind.get(&AssignmentKind::Teaching), Some(&1));
    assert_eq!(app.store.notification_count(), 2);
}

#[tokio::test]
async fn test_reminder_retried_after_transient_failures_flags_once() {
    let app = helpers::TestApp::new();
    let person = app.create_person("Ana", "Ruiz", Some("ana@facet.example.edu"));
    let reference = app.store.insert_assignment(
        AssignmentKind::Teaching,
        AssignmentRecord::active(person, "Calculus I", helpers::days_from_today(29)),
    );
    let transient = || Err(DeliveryError::Transient("connection reset".to_string()));
    app.transport.push([transient(), transient()]);

    let due = app.scanner.preview(Utc::now()).await.unwrap();
    let task_id = app
        .dispatcher
        .submit(templates::reminder_request(&due[0]))
        .unwrap()
        .task_id();
    let task = app.wait_for_terminal(task_id).await;

    assert_eq!(task.status, DispatchStatus::Succeeded);
    assert_eq!(task.retry_count, 2);
    assert!(task.outcome.unwrap().assignment_flagged);
    assert!(app.store.get_assignment(reference).unwrap().notified);
    assert_eq!(app.store.notification_count(), 1);
}

#[tokio::test]
async fn test_exhausted_reminder_leaves_assignment_unflagged() {
    let app = helpers::TestApp::new();
    let person = app.create_person("Ana", "Ruiz", Some("ana@facet.example.edu"));
    let reference = app.store.insert_assignment(
        AssignmentKind::DepartmentLeadership,
        AssignmentRecord::active(person, "Mathematics", helpers::days_from_today(12)),
    );
    app.transport.push(
        (0..4).map(|_| Err(DeliveryError::Transient("relay unavailable".to_string()))),
    );

    app.scanner.run().await;
    app.wait_for_idle().await;

    assert!(!app.store.get_assignment(reference).unwrap().notified);
    assert_eq!(app.store.notification_count(), 0);
    assert_eq!(app.transport.sent().len(), 4);

    // The next cycle picks it up again.
    assert_eq!(app.scanner.run().await.scheduled, 1);
    app.wait_for_idle().await;
    assert!(app.store.get_assignment(reference).unwrap().notified);
}
