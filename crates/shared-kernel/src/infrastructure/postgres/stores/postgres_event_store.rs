// crates/shared-kernel/src/infrastructure/postgres/stores/postgres_event_store.rs

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use crate::domain::outbox::{OutboxEvent, SearchEventsOptions, UpdateEventsOptions};
use crate::domain::repositories::EventStore;
use crate::domain::transaction::Transaction;
use crate::errors::Result;
use crate::infrastructure::postgres::mappers::SqlxErrorExt;
use crate::infrastructure::postgres::rows::OutboxEventRow;
use crate::infrastructure::postgres::transactions::TransactionExt;

const OUTBOX_COLUMNS: &str = "id, aggregate_type, aggregate_id, event_type, payload, \
     created_at, published_at, retry_count, next_attempt_at";

#[derive(Clone)]
pub struct PostgresEventStore {
    pool: PgPool,
}

impl PostgresEventStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

pub(crate) fn build_search_query(options: &SearchEventsOptions) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT {} FROM outbox_events WHERE TRUE", OUTBOX_COLUMNS));

    if let Some(not_before) = options.not_before {
        qb.push(" AND created_at >= ").push_bind(not_before);
    }
    if let Some(not_after) = options.not_after {
        qb.push(" AND created_at <= ").push_bind(not_after);
    }
    if let Some(aggregate_type) = &options.aggregate_type {
        qb.push(" AND aggregate_type = ").push_bind(aggregate_type.clone());
    }
    if let Some(event_type) = &options.event_type {
        qb.push(" AND event_type = ").push_bind(event_type.clone());
    }
    if options.only_unpublished {
        qb.push(" AND published_at IS NULL");
    }
    if let Some(max) = options.max_retry_count {
        qb.push(" AND retry_count <= ").push_bind(max);
    }
    if let Some(due_at) = options.due_at {
        qb.push(" AND (next_attempt_at IS NULL OR next_attempt_at <= ")
            .push_bind(due_at)
            .push(")");
    }

    qb.push(" ORDER BY created_at ASC, id ASC");

    if let Some(limit) = options.limit {
        qb.push(" LIMIT ").push_bind(limit);
    }
    if options.lock {
        qb.push(" FOR UPDATE SKIP LOCKED");
    }

    qb
}

/// `None` si aucune mutation n'est demandée.
pub(crate) fn build_update_query(options: &UpdateEventsOptions) -> Option<QueryBuilder<'static, Postgres>> {
    if !options.has_mutation() {
        return None;
    }

    let mut qb = QueryBuilder::new("UPDATE outbox_events SET ");
    {
        let mut sets = qb.separated(", ");
        if let Some(at) = options.set_published_at {
            sets.push("published_at = ").push_bind_unseparated(at);
        }
        if let Some(by) = options.inc_retry_by {
            sets.push("retry_count = retry_count + ").push_bind_unseparated(by);
        }
        if let Some(at) = options.set_next_attempt_at {
            sets.push("next_attempt_at = ").push_bind_unseparated(at);
        }
    }

    qb.push(" WHERE TRUE");

    if let Some(ids) = &options.ids {
        qb.push(" AND id = ANY(").push_bind(ids.clone()).push(")");
    }
    if let Some(aggregate_type) = &options.aggregate_type {
        qb.push(" AND aggregate_type = ").push_bind(aggregate_type.clone());
    }
    if let Some(not_before) = options.not_before {
        qb.push(" AND created_at >= ").push_bind(not_before);
    }
    if let Some(not_after) = options.not_after {
        qb.push(" AND created_at <= ").push_bind(not_after);
    }
    if options.only_unpublished {
        qb.push(" AND published_at IS NULL");
    }

    Some(qb)
}

#[async_trait]
impl EventStore for PostgresEventStore {
    async fn save_event(&self, tx: &mut dyn Transaction, event: &OutboxEvent) -> Result<()> {
        let sqlx_tx = tx.downcast_mut_sqlx()?;

        sqlx::query(
            r#"
            INSERT INTO outbox_events (id, aggregate_type, aggregate_id, event_type, payload, created_at, published_at, retry_count, next_attempt_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
            .bind(event.id)
            .bind(&event.aggregate_type)
            .bind(&event.aggregate_id)
            .bind(&event.event_type)
            .bind(&event.payload)
            .bind(event.created_at)
            .bind(event.published_at)
            .bind(event.retry_count)
            .bind(event.next_attempt_at)
            .execute(&mut **sqlx_tx)
            .await
            .map_domain("outbox_event")?;

        Ok(())
    }

    async fn search_events(
        &self,
        tx: Option<&mut dyn Transaction>,
        options: SearchEventsOptions,
    ) -> Vec<OutboxEvent> {
        let mut qb = build_search_query(&options);

        let result = <dyn Transaction>::execute_on(&self.pool, tx, move |conn| {
            Box::pin(async move {
                qb.build_query_as::<OutboxEventRow>()
                    .fetch_all(conn)
                    .await
                    .map_domain_infra("Failed to search outbox events")
            })
        })
            .await;

        match result {
            Ok(rows) => rows.into_iter().map(OutboxEvent::from).collect(),
            Err(e) => {
                tracing::error!(error = %e, ?options, "Outbox search failed, returning no events");
                Vec::new()
            }
        }
    }

    async fn update_events(
        &self,
        tx: Option<&mut dyn Transaction>,
        options: UpdateEventsOptions,
    ) -> Result<u64> {
        if options.targets_nothing() {
            return Ok(0);
        }
        let Some(mut qb) = build_update_query(&options) else {
            return Ok(0);
        };

        <dyn Transaction>::execute_on(&self.pool, tx, move |conn| {
            Box::pin(async move {
                let done = qb
                    .build()
                    .execute(conn)
                    .await
                    .map_domain_infra("Failed to update outbox events")?;
                Ok(done.rows_affected())
            })
        })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn locking_search_puts_skip_locked_after_limit() {
        let now = Utc::now();
        let options = SearchEventsOptions::new()
            .with_window(now - chrono::Duration::hours(24), now)
            .with_aggregate_type("friend_request")
            .only_unpublished()
            .with_max_retry_count(5)
            .due_at(now)
            .with_limit(100)
            .locked();

        let qb = build_search_query(&options);
        let sql = qb.sql();

        assert!(sql.contains("created_at >= $1"));
        assert!(sql.contains("aggregate_type = $3"));
        assert!(sql.contains("published_at IS NULL"));
        assert!(sql.contains("retry_count <= $4"));
        assert!(sql.contains("(next_attempt_at IS NULL OR next_attempt_at <= $5)"));
        assert!(sql.ends_with("ORDER BY created_at ASC, id ASC LIMIT $6 FOR UPDATE SKIP LOCKED"));
    }

    #[test]
    fn plain_search_has_no_lock_and_no_limit() {
        let qb = build_search_query(&SearchEventsOptions::new().with_event_type("FriendRequestCreated"));
        let sql = qb.sql();

        assert!(sql.contains("event_type = $1"));
        assert!(!sql.contains("LIMIT"));
        assert!(!sql.contains("FOR UPDATE"));
    }

    #[test]
    fn update_without_mutation_builds_nothing() {
        let options = UpdateEventsOptions::for_ids(vec![Uuid::now_v7()]).only_unpublished();
        assert!(build_update_query(&options).is_none());
    }

    #[test]
    fn update_combines_mutations_and_scope() {
        let now = Utc::now();
        let options = UpdateEventsOptions::for_ids(vec![Uuid::now_v7()])
            .with_aggregate_type(Some("friend_request".into()))
            .only_unpublished()
            .inc_retry_by(1)
            .set_next_attempt_at(now);

        let qb = build_update_query(&options).unwrap();
        let sql = qb.sql();

        assert!(sql.starts_with("UPDATE outbox_events SET retry_count = retry_count + $1, next_attempt_at = $2 WHERE TRUE"));
        assert!(sql.contains("id = ANY($3)"));
        assert!(sql.contains("aggregate_type = $4"));
        assert!(sql.ends_with("published_at IS NULL"));
    }
}
