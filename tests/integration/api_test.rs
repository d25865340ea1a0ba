//! Integration tests for the HTTP API.

mod helpers;

use axum::http::StatusCode;
use chrono::Utc;

use facet_core::types::{NotificationId, TaskId};
use facet_database::memory::AssignmentRecord;
use facet_entity::assignment::AssignmentKind;

#[tokio::test]
async fn test_health() {
    let app = helpers::TestApp::new();

    let response = app.request("GET", "/api/health", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "ok");
    assert_eq!(response.body["data"]["store"], "memory");
    assert_eq!(response.body["data"]["tasks_pending"], 0);
}

#[tokio::test]
async fn test_dispatch_returns_accepted_and_task_is_pollable() {
    let app = helpers::TestApp::new();
    let person = app.create_person("Ana", "Ruiz", Some("ana@facet.example.edu"));

    let response = app
        .request(
            "POST",
            "/api/notifications/dispatch",
            Some(serde_json::json!({
                "person_id": person,
                "message": "Your appointment is up for renewal",
            })),
        )
        .await;

    assert_eq!(response.status, StatusCode::ACCEPTED);
    let task_id: TaskId = serde_json::from_value(response.body["data"]["task_id"].clone()).unwrap();

    app.wait_for_terminal(task_id).await;

    let response = app
        .request("GET", &format!("/api/tasks/{task_id}"), None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "succeeded");
    assert_eq!(response.body["data"]["attempts"], 1);
}

#[tokio::test]
async fn test_dispatch_with_empty_message_is_rejected() {
    let app = helpers::TestApp::new();
    let person = app.create_person("Ana", "Ruiz", Some("ana@facet.example.edu"));

    let response = app
        .request(
            "POST",
            "/api/notifications/dispatch",
            Some(serde_json::json!({ "person_id": person, "message": "" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_unknown_task_is_not_found() {
    let app = helpers::TestApp::new();

    let get = app
        .request("GET", &format!("/api/tasks/{}", TaskId::new()), None)
        .await;
    let delete = app
        .request("DELETE", &format!("/api/tasks/{}", TaskId::new()), None)
        .await;

    assert_eq!(get.status, StatusCode::NOT_FOUND);
    assert_eq!(delete.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cancel_finished_task_conflicts() {
    let app = helpers::TestApp::new();
    let person = app.create_person("Ana", "Ruiz", Some("ana@facet.example.edu"));

    let response = app
        .request(
            "POST",
            "/api/notifications/dispatch",
            Some(serde_json::json!({ "person_id": person, "message": "Reminder" })),
        )
        .await;
    let task_id: TaskId = serde_json::from_value(response.body["data"]["task_id"].clone()).unwrap();
    app.wait_for_terminal(task_id).await;

    let response = app
        .request("DELETE", &format!("/api/tasks/{task_id}"), None)
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_list_and_mark_read() {
    let app = helpers::TestApp::new();
    let person = app.create_person("Ana", "Ruiz", Some("ana@facet.example.edu"));
    let notification = app
        .store
        .insert_notification_at(person, "Reminder", Utc::now());

    let response = app
        .request("GET", &format!("/api/notifications?person_id={person}"), None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"].as_array().unwrap().len(), 1);
    assert_eq!(response.body["data"][0]["is_read"], false);

    let response = app
        .request(
            "PATCH",
            &format!("/api/notifications/{}/read", notification.id),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["is_read"], true);

    let missing = app
        .request(
            "PATCH",
            &format!("/api/notifications/{}/read", NotificationId::new()),
            None,
        )
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_verify_expirations_endpoint() {
    let app = helpers::TestApp::new();
    let person = app.create_person("Ana", "Ruiz", Some("ana@facet.example.edu"));
    app.store.insert_assignment(
        AssignmentKind::Teaching,
        AssignmentRecord::active(person, "Calculus I", helpers::days_from_today(29)),
    );

    let upcoming = app.request("GET", "/api/expirations/upcoming", None).await;
    assert_eq!(upcoming.status, StatusCode::OK);
    assert_eq!(upcoming.body["data"].as_array().unwrap().len(), 1);

    let response = app
        .request("POST", "/api/jobs/verify-expirations", None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["scheduled"], 1);

    app.wait_for_idle().await;
    assert_eq!(app.store.notification_count(), 1);
}

#[tokio::test]
async fn test_cleanup_endpoint() {
    let app = helpers::TestApp::new();

    let response = app
        .request("POST", "/api/jobs/cleanup-notifications", None)
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["deleted"], 0);
}
