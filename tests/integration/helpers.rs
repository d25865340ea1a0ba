//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{NaiveDate, Utc};
use serde_json::Value;
use tower::ServiceExt;

use facet_core::config::AppConfig;
use facet_core::types::{PersonId, TaskId};
use facet_database::{MemoryStore, StoreBackend};
use facet_database::store::Stores;
use facet_entity::dispatch::{DispatchStatus, DispatchTask};
use facet_entity::person::Person;
use facet_mail::{DeliveryError, MailMessage, MailTransport};
use facet_worker::jobs::{ExpirationScanner, NotificationCleanupJob};
use facet_worker::{Dispatcher, DispatcherConfig, RetryPolicy};

/// Transport that replays queued outcomes and records every message.
///
/// Once the script runs out every send succeeds.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Result<(), DeliveryError>>>,
    sent: Mutex<Vec<MailMessage>>,
    delay: Mutex<Duration>,
}

impl ScriptedTransport {
    /// Queue outcomes for the next sends, in order.
    pub fn push(&self, outcomes: impl IntoIterator<Item = Result<(), DeliveryError>>) {
        self.script.lock().unwrap().extend(outcomes);
    }

    /// Make every send take `delay` before resolving.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = delay;
    }

    /// Messages passed to `send`, including failed ones.
    pub fn sent(&self) -> Vec<MailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MailTransport for ScriptedTransport {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn send(&self, message: &MailMessage) -> Result<(), DeliveryError> {
        let delay = *self.delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.sent.lock().unwrap().push(message.clone());
        self.script.lock().unwrap().pop_front().unwrap_or(Ok(()))
    }
}

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Backing store for direct inspection
    pub store: Arc<MemoryStore>,
    /// Mail transport double
    pub transport: Arc<ScriptedTransport>,
    /// Running dispatcher
    pub dispatcher: Arc<Dispatcher>,
    /// Expiration scanner
    pub scanner: Arc<ExpirationScanner>,
    /// Retention cleanup
    pub cleanup: Arc<NotificationCleanupJob>,
    /// Application config
    pub config: AppConfig,
}

impl TestApp {
    /// Create a new test application with three 10ms retries.
    pub fn new() -> Self {
        Self::with_retries(3)
    }

    /// Create a new test application with `max_retries` 10ms retries.
    pub fn with_retries(max_retries: u32) -> Self {
        Self::with_policy(RetryPolicy::fixed(Duration::from_millis(10), max_retries))
    }

    /// Create a new test application with the given retry policy.
    pub fn with_policy(retry: RetryPolicy) -> Self {
        let config = AppConfig::default();
        let store = Arc::new(MemoryStore::new());
        let stores = Stores::memory(Arc::clone(&store));
        let transport = Arc::new(ScriptedTransport::default());

        let dispatcher_config = DispatcherConfig {
            concurrency: 2,
            from_address: config.mail.from_address.clone(),
            retry,
            shutdown_grace: Duration::from_secs(1),
            task_result_ttl: None,
        };
        let (dispatcher, _worker) =
            Dispatcher::start(dispatcher_config, stores.clone(), transport.clone());

        let scanner = Arc::new(ExpirationScanner::new(
            Arc::clone(&stores.assignments),
            Arc::clone(&dispatcher),
            &config.expiration,
        ));
        let cleanup = Arc::new(NotificationCleanupJob::new(
            Arc::clone(&stores.notifications),
            &config.retention,
        ));

        let backend = StoreBackend {
            stores,
            pool: None,
        };
        let state = facet_api::AppState::new(
            Arc::new(config.clone()),
            &backend,
            Arc::clone(&dispatcher),
            Arc::clone(&scanner),
            Arc::clone(&cleanup),
        );
        let router = facet_api::build_router(state);

        Self {
            router,
            store,
            transport,
            dispatcher,
            scanner,
            cleanup,
            config,
        }
    }

    /// Insert a person and return their id.
    pub fn create_person(&self, first_name: &str, last_name: &str, email: Option<&str>) -> PersonId {
        let id = PersonId::new();
        self.store.insert_person(Person {
            id,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: email.map(str::to_string),
        });
        id
    }

    /// Poll until the task reaches a terminal status.
    pub async fn wait_for_terminal(&self, task_id: TaskId) -> DispatchTask {
        for _ in 0..500 {
            if let Some(task) = self.dispatcher.status(task_id) {
                if task.status.is_terminal() {
                    return task;
                }
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!(
            "Task {} did not finish: {:?}",
            task_id,
            self.dispatcher.status(task_id)
        );
    }

    /// Poll until no task is pending or in progress.
    pub async fn wait_for_idle(&self) {
        let registry = self.dispatcher.registry();
        for _ in 0..500 {
            let open = registry.count_with_status(DispatchStatus::Pending)
                + registry.count_with_status(DispatchStatus::InProgress);
            if open == 0 {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("Dispatch tasks still open after 5s");
    }

    /// Make an HTTP request to the test app
    pub async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Today plus `days`, in UTC.
pub fn days_from_today(days: i64) -> NaiveDate {
    Utc::now().date_naive() + chrono::Duration::days(days)
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}
