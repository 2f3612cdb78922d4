// crates/shared-kernel/src/infrastructure/postgres/rows/postgres_inbox_message_row.rs

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use crate::domain::inbox::InboxMessage;
use crate::errors::DomainError;

#[derive(FromRow)]
pub struct InboxMessageRow {
    id: String,
    topic: String,
    partition: i32,
    kafka_offset: i64,
    payload: Vec<u8>,
    status: String,
    attempts: i32,
    last_error: Option<String>,
    received_at: DateTime<Utc>,
    processed_at: Option<DateTime<Utc>>,
}

impl TryFrom<InboxMessageRow> for InboxMessage {
    type Error = DomainError;

    fn try_from(row: InboxMessageRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            topic: row.topic,
            partition: row.partition,
            offset: row.kafka_offset,
            payload: row.payload,
            status: row.status.parse()?,
            attempts: row.attempts,
            last_error: row.last_error,
            received_at: row.received_at,
            processed_at: row.processed_at,
        })
    }
}
