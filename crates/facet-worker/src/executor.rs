//! Single dispatch attempt.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing;

use facet_database::store::Stores;
use facet_entity::dispatch::{DispatchOutcome, DispatchTask};
use facet_mail::{MailMessage, MailTransport};

use crate::error::DispatchError;

/// Runs one delivery attempt for a task.
#[derive(Debug, Clone)]
pub struct DispatchExecutor {
    stores: Stores,
    transport: Arc<dyn MailTransport>,
    from_address: String,
}

impl DispatchExecutor {
    /// Create a new executor.
    pub fn new(stores: Stores, transport: Arc<dyn MailTransport>, from_address: String) -> Self {
        Self {
            stores,
            transport,
            from_address,
        }
    }

    /// Validate the recipient, record the notification, send it, and flag
    /// the origin assignment.
    ///
    /// The notification row is written before sending and removed again if
    /// the send fails or is cancelled, so a task leaves at most one row and
    /// only when it succeeds. An already-cancelled token stops the attempt
    /// before anything is written or sent.
    pub async fn attempt(
        &self,
        task: &DispatchTask,
        cancel: &CancellationToken,
    ) -> Result<DispatchOutcome, DispatchError> {
        let request = &task.request;

        let person = self
            .stores
            .persons
            .find_by_id(request.person_id)
            .await?
            .ok_or(DispatchError::RecipientNotFound(request.person_id))?;

        let email = person
            .deliverable_email()
            .ok_or(DispatchError::NoEmail(person.id))?
            .to_string();

        if cancel.is_cancelled() {
            return Err(DispatchError::Cancelled);
        }

        let notification = self
            .stores
            .notifications
            .create(person.id, &request.message)
            .await?;

        let message = MailMessage {
            from: self.from_address.clone(),
            to: email.clone(),
            subject: request.subject.clone(),
            body: request.message.clone(),
        };

        // Cancellation is polled first so a cancelled task never starts a send.
        let sent = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(DispatchError::Cancelled),
            result = self.transport.send(&message) => result.map_err(DispatchError::from),
        };

        if let Err(err) = sent {
            if let Err(e) = self.stores.notifications.delete(notification.id).await {
                tracing::error!(
                    "Failed to withdraw notification {} after failed send: {}",
                    notification.id,
                    e
                );
            }
            return Err(err);
        }

        let assignment_flagged = match request.origin {
            // The message is already out; a flag failure must not trigger a resend.
            Some(origin) => match self.stores.assignments.mark_notified(origin).await {
                Ok(true) => true,
                Ok(false) => {
                    tracing::warn!(
                        "Assignment {} was already flagged as notified when task {} delivered",
                        origin,
                        task.id
                    );
                    false
                }
                Err(e) => {
                    tracing::error!(
                        "Delivered task {} but failed to flag assignment {}: {}",
                        task.id,
                        origin,
                        e
                    );
                    false
                }
            },
            None => false,
        };

        tracing::info!(
            task_id = %task.id,
            person_id = %person.id,
            attempt = task.attempts,
            "Notification delivered to {}",
            email
        );

        Ok(DispatchOutcome {
            notification_id: notification.id,
            email,
            assignment_flagged,
        })
    }
}
