// crates/shared-kernel/src/infrastructure/postgres/stores/postgres_inbox_store.rs

use async_trait::async_trait;
use chrono::{Duration, Utc};
use sqlx::PgPool;
use crate::domain::inbox::{InboxMessage, UpdateInboxMessageParams};
use crate::domain::repositories::InboxStore;
use crate::domain::transaction::Transaction;
use crate::errors::{DomainError, Result};
use crate::infrastructure::postgres::mappers::SqlxErrorExt;
use crate::infrastructure::postgres::rows::InboxMessageRow;

#[derive(Clone)]
pub struct PostgresInboxStore {
    pool: PgPool,
}

impl PostgresInboxStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InboxStore for PostgresInboxStore {
    async fn save_inbox_message(
        &self,
        tx: Option<&mut dyn Transaction>,
        message: &InboxMessage,
    ) -> Result<bool> {
        let message = message.clone();

        <dyn Transaction>::execute_on(&self.pool, tx, move |conn| {
            Box::pin(async move {
                let done = sqlx::query(
                    r#"
                    INSERT INTO inbox_messages (id, topic, "partition", kafka_offset, payload, status, attempts, last_error, received_at, processed_at)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                    ON CONFLICT (id) DO NOTHING
                    "#,
                )
                    .bind(&message.id)
                    .bind(&message.topic)
                    .bind(message.partition)
                    .bind(message.offset)
                    .bind(&message.payload)
                    .bind(message.status.as_str())
                    .bind(message.attempts)
                    .bind(&message.last_error)
                    .bind(message.received_at)
                    .bind(message.processed_at)
                    .execute(conn)
                    .await
                    .map_domain_infra("Failed to save inbox message")?;

                Ok(done.rows_affected() == 1)
            })
        })
            .await
    }

    async fn get_pending_messages_for_processing(
        &self,
        tx: Option<&mut dyn Transaction>,
        max_attempts: i32,
        batch_size: i64,
    ) -> Result<Vec<InboxMessage>> {
        let rows = <dyn Transaction>::execute_on(&self.pool, tx, move |conn| {
            Box::pin(async move {
                sqlx::query_as::<_, InboxMessageRow>(
                    r#"
                    SELECT id, topic, "partition", kafka_offset, payload, status, attempts, last_error, received_at, processed_at
                    FROM inbox_messages
                    WHERE status IN ('received', 'processing', 'failed')
                      AND attempts < $1
                    ORDER BY received_at ASC
                    LIMIT $2
                    FOR UPDATE SKIP LOCKED
                    "#,
                )
                    .bind(max_attempts)
                    .bind(batch_size)
                    .fetch_all(conn)
                    .await
                    .map_domain_infra("Failed to fetch pending inbox messages")
            })
        })
            .await?;

        rows.into_iter().map(InboxMessage::try_from).collect()
    }

    async fn update_inbox_message(
        &self,
        tx: Option<&mut dyn Transaction>,
        params: UpdateInboxMessageParams,
    ) -> Result<()> {
        let id = params.id.clone();

        let affected = <dyn Transaction>::execute_on(&self.pool, tx, move |conn| {
            Box::pin(async move {
                let done = sqlx::query(
                    r#"
                    UPDATE inbox_messages
                    SET status = $2,
                        attempts = $3,
                        last_error = $4,
                        processed_at = COALESCE($5, processed_at)
                    WHERE id = $1
                    "#,
                )
                    .bind(&params.id)
                    .bind(params.status.as_str())
                    .bind(params.attempts)
                    .bind(&params.last_error)
                    .bind(params.processed_at)
                    .execute(conn)
                    .await
                    .map_domain_infra("Failed to update inbox message")?;
                Ok(done.rows_affected())
            })
        })
            .await?;

        if affected == 0 {
            return Err(DomainError::NotFound { entity: "inbox_message", id });
        }
        Ok(())
    }

    async fn delete_old_processed_messages(
        &self,
        tx: Option<&mut dyn Transaction>,
        retention: Duration,
        batch_size: i64,
    ) -> Result<u64> {
        let cutoff = Utc::now() - retention;

        <dyn Transaction>::execute_on(&self.pool, tx, move |conn| {
            Box::pin(async move {
                let done = sqlx::query(
                    r#"
                    DELETE FROM inbox_messages
                    WHERE id IN (
                        SELECT id FROM inbox_messages
                        WHERE status = 'processed'
                          AND processed_at < $1
                        ORDER BY processed_at ASC
                        LIMIT $2
                        FOR UPDATE SKIP LOCKED
                    )
                    "#,
                )
                    .bind(cutoff)
                    .bind(batch_size)
                    .execute(conn)
                    .await
                    .map_domain_infra("Failed to delete processed inbox messages")?;
                Ok(done.rows_affected())
            })
        })
            .await
    }
}
