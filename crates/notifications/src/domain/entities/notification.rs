// crates/notifications/src/domain/entities/notification.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::domain::entities::NotificationKind;

/// Notification destinée à un utilisateur.
/// `source_event_id` est l'identifiant du message inbox qui l'a produite : une seule notification par événement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub recipient_id: String,
    pub kind: NotificationKind,
    pub actor_id: String,
    pub source_event_id: String,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(
        recipient_id: impl Into<String>,
        kind: NotificationKind,
        actor_id: impl Into<String>,
        source_event_id: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            recipient_id: recipient_id.into(),
            kind,
            actor_id: actor_id.into(),
            source_event_id: source_event_id.into(),
            created_at,
        }
    }
}
