// crates/notifications/src/application/handle_friend_request_event/friend_request_event_handler.rs

use std::sync::Arc;
use async_trait::async_trait;
use shared_kernel::application::ports::InboxMessageHandler;
use shared_kernel::clock::Clock;
use shared_kernel::domain::inbox::InboxMessage;
use shared_kernel::errors::{AppResult, DomainError};
use crate::application::handle_friend_request_event::FriendRequestEvent;
use crate::domain::entities::{Notification, NotificationKind};
use crate::domain::repositories::NotificationRepository;

pub struct FriendRequestEventHandler {
    repo: Arc<dyn NotificationRepository>,
    clock: Arc<dyn Clock>,
}

impl FriendRequestEventHandler {
    pub fn new(repo: Arc<dyn NotificationRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }

    /// Notification à produire pour un événement, `None` s'il n'en appelle aucune.
    fn to_notification(&self, event: FriendRequestEvent, source_event_id: &str) -> Option<Notification> {
        let (recipient, kind, actor) = match event {
            FriendRequestEvent::Created(created) => {
                (created.receiver_id, NotificationKind::FriendRequestReceived, created.sender_id)
            }
            FriendRequestEvent::Updated(updated) => {
                let kind = match updated.status.as_str() {
                    "accepted" => NotificationKind::FriendRequestAccepted,
                    "declined" => NotificationKind::FriendRequestDeclined,
                    _ => return None,
                };
                (updated.sender_id, kind, updated.receiver_id)
            }
            FriendRequestEvent::Ignored(_) => return None,
        };

        Some(Notification::new(recipient, kind, actor, source_event_id, self.clock.now()))
    }
}

#[async_trait]
impl InboxMessageHandler for FriendRequestEventHandler {
    async fn handle(&self, message: &InboxMessage) -> AppResult<()> {
        // JSON corrompu : erreur, le message sera retenté puis abandonné
        let event = FriendRequestEvent::parse(&message.payload).map_err(|e| {
            DomainError::Validation {
                field: "payload",
                reason: format!("Malformed friend request event: {e}"),
            }
        })?;

        let Some(notification) = self.to_notification(event, &message.id) else {
            tracing::debug!(event_id = %message.id, "Event ignored");
            return Ok(());
        };

        let inserted = self.repo.save(&notification).await?;
        if inserted {
            tracing::info!(
                event_id = %message.id,
                recipient_id = %notification.recipient_id,
                kind = %notification.kind,
                "Notification created"
            );
        } else {
            tracing::debug!(event_id = %message.id, "Notification already created for this event");
        }

        Ok(())
    }
}
