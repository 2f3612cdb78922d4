// crates/notifications/src/infrastructure/postgres/rows/notification_row.rs

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;
use shared_kernel::errors::DomainError;
use crate::domain::entities::Notification;

#[derive(Debug, FromRow)]
pub struct NotificationRow {
    pub id: Uuid,
    pub recipient_id: String,
    pub kind: String,
    pub actor_id: String,
    pub source_event_id: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<NotificationRow> for Notification {
    type Error = DomainError;

    fn try_from(row: NotificationRow) -> Result<Self, Self::Error> {
        Ok(Notification {
            id: row.id,
            recipient_id: row.recipient_id,
            kind: row.kind.parse()?,
            actor_id: row.actor_id,
            source_event_id: row.source_event_id,
            created_at: row.created_at,
        })
    }
}
