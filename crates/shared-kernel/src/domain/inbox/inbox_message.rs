// crates/shared-kernel/src/domain/inbox/inbox_message.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::domain::inbox::InboxStatus;

/// Message Kafka persisté avant traitement.
///
/// `id` est l'identifiant de l'événement amont (header `event_id`), ce qui rend
/// l'insertion idempotente vis-à-vis des redeliveries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboxMessage {
    pub id: String,
    pub topic: String,
    pub partition: i32,
    pub offset: i64,
    pub payload: Vec<u8>,
    pub status: InboxStatus,
    pub attempts: i32,
    pub last_error: Option<String>,
    pub received_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
}

impl InboxMessage {
    pub fn received(
        id: impl Into<String>,
        topic: impl Into<String>,
        partition: i32,
        offset: i64,
        payload: Vec<u8>,
        received_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            topic: topic.into(),
            partition,
            offset,
            payload,
            status: InboxStatus::Received,
            attempts: 0,
            last_error: None,
            received_at,
            processed_at: None,
        }
    }

    pub fn is_processed(&self) -> bool {
        self.status == InboxStatus::Processed
    }
}
