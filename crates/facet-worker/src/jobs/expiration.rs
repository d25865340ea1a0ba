//! Expiration scanner.
//!
//! Finds active, un-notified assignments ending within the horizon and
//! submits one renewal reminder per assignment. The scanner never waits
//! for delivery.
//!
//! Runs must not overlap across processes. A single scheduler instance
//! provides that guarantee; within one process the registry's in-flight
//! index and the conditional `notified` write keep an accidental overlap
//! from double-notifying.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::Serialize;
use tracing;

use facet_core::config::schedule::ExpirationConfig;
use facet_core::result::AppResult;
use facet_database::store::AssignmentStore;
use facet_entity::assignment::{AssignmentKind, ExpiringAssignment};

use crate::dispatcher::Dispatcher;
use crate::registry::Registration;
use crate::templates;

/// Outcome of one scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    /// First day of the window.
    pub from: Option<NaiveDate>,
    /// Last day of the window.
    pub until: Option<NaiveDate>,
    /// Reminders submitted.
    pub scheduled: usize,
    /// Assignments that already had a reminder in flight.
    pub skipped_in_flight: usize,
    /// Assignments or queries that could not be processed.
    pub failed: usize,
    /// Reminders submitted per assignment kind.
    pub by_kind: BTreeMap<AssignmentKind, usize>,
}

/// Scans for expiring assignments and submits reminders.
#[derive(Debug, Clone)]
pub struct ExpirationScanner {
    assignments: Arc<dyn AssignmentStore>,
    dispatcher: Arc<Dispatcher>,
    horizon_days: u32,
}

impl ExpirationScanner {
    /// Create a new scanner.
    pub fn new(
        assignments: Arc<dyn AssignmentStore>,
        dispatcher: Arc<Dispatcher>,
        config: &ExpirationConfig,
    ) -> Self {
        Self {
            assignments,
            dispatcher,
            horizon_days: config.horizon_days,
        }
    }

    /// Scan relative to the current time.
    pub async fn run(&self) -> ScanReport {
        self.run_at(Utc::now()).await
    }

    /// Scan relative to `now`. Store errors are counted, never propagated.
    pub async fn run_at(&self, now: DateTime<Utc>) -> ScanReport {
        let (from, until) = self.window(now);
        tracing::info!("Verifying expirations between {} and {}", from, until);

        let mut report = ScanReport {
            from: Some(from),
            until: Some(until),
            ..ScanReport::default()
        };

        for kind in AssignmentKind::ALL {
            let due = match self.assignments.find_expiring(kind, from, until).await {
                Ok(due) => due,
                Err(e) => {
                    tracing::error!("Failed to query expiring {} assignments: {}", kind, e);
                    report.failed += 1;
                    continue;
                }
            };

            for assignment in due {
                self.schedule(&assignment, &mut report);
            }
        }

        tracing::info!(
            "Expiration verification complete: {} scheduled, {} already in flight, {} failed",
            report.scheduled,
            report.skipped_in_flight,
            report.failed
        );
        report
    }

    fn schedule(&self, assignment: &ExpiringAssignment, report: &mut ScanReport) {
        let reference = assignment.reference;
        match self.dispatcher.submit(templates::reminder_request(assignment)) {
            Ok(Registration::Created(task_id)) => {
                tracing::debug!("Scheduled reminder for {} as task {}", reference, task_id);
                report.scheduled += 1;
                *report.by_kind.entry(reference.kind).or_default() += 1;
            }
            Ok(Registration::InFlight(task_id)) => {
                tracing::debug!("Reminder for {} already in flight as task {}", reference, task_id);
                report.skipped_in_flight += 1;
            }
            Err(e) => {
                tracing::error!("Failed to schedule reminder for {}: {}", reference, e);
                report.failed += 1;
            }
        }
    }

    /// Assignments that a scan at `now` would pick up, without submitting.
    pub async fn preview(&self, now: DateTime<Utc>) -> AppResult<Vec<ExpiringAssignment>> {
        let (from, until) = self.window(now);
        let mut due = Vec::new();
        for kind in AssignmentKind::ALL {
            due.extend(self.assignments.find_expiring(kind, from, until).await?);
        }
        due.sort_by_key(|a| a.end_date);
        Ok(due)
    }

    fn window(&self, now: DateTime<Utc>) -> (NaiveDate, NaiveDate) {
        let today = now.date_naive();
        let until = today
            .checked_add_days(Days::new(u64::from(self.horizon_days)))
            .unwrap_or(NaiveDate::MAX);
        (today, until)
    }
}
