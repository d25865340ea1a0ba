//! Renewal reminder templates.
//!
//! The scanner picks the template by assignment kind; the worker treats the
//! rendered subject and body as opaque text.

use facet_entity::assignment::{AssignmentKind, ExpiringAssignment};
use facet_entity::dispatch::DispatchRequest;

/// Subject for department leadership reminders.
pub const LEADERSHIP_SUBJECT: &str = "Reminder: department leadership term renewal";

/// Subject for teaching assignment reminders.
pub const TEACHING_SUBJECT: &str = "Reminder: teaching assignment renewal";

const SIGNATURE: &str = "Personnel Office";

/// A rendered subject and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage {
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub body: String,
}

/// Render the reminder for an expiring assignment.
pub fn render(assignment: &ExpiringAssignment) -> RenderedMessage {
    match assignment.reference.kind {
        AssignmentKind::DepartmentLeadership => leadership(assignment),
        AssignmentKind::Teaching => teaching(assignment),
    }
}

/// Build the dispatch request for an expiring assignment.
pub fn reminder_request(assignment: &ExpiringAssignment) -> DispatchRequest {
    let rendered = render(assignment);
    DispatchRequest::new(assignment.holder.id, rendered.body, Some(rendered.subject))
        .with_origin(assignment.reference)
}

fn leadership(a: &ExpiringAssignment) -> RenderedMessage {
    let body = format!(
        "Dear {name},\n\n\
         This is to let you know that your term as head of the {department} \
         department ends on {date}.\n\n\
         To renew the appointment, please visit the Personnel Office with the \
         required documentation.\n\n\
         Thank you for your attention.\n\n\
         {SIGNATURE}",
        name = a.holder.full_name(),
        department = a.context,
        date = a.end_date.format("%d/%m/%Y"),
    );
    RenderedMessage {
        subject: LEADERSHIP_SUBJECT.to_string(),
        body,
    }
}

fn teaching(a: &ExpiringAssignment) -> RenderedMessage {
    let role = match a.position.as_deref().map(str::trim) {
        Some(position) if !position.is_empty() => format!("{position} for"),
        _ => "teaching assignment in".to_string(),
    };
    let body = format!(
        "Dear {name},\n\n\
         This is to let you know that your {role} {subject} ends on {date}.\n\n\
         To renew the appointment, please visit the Personnel Office with the \
         required documentation.\n\n\
         Thank you for your attention.\n\n\
         {SIGNATURE}",
        name = a.holder.full_name(),
        subject = a.context,
        date = a.end_date.format("%d/%m/%Y"),
    );
    RenderedMessage {
        subject: TEACHING_SUBJECT.to_string(),
        body,
    }
}
