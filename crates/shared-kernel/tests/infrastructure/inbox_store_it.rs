// crates/shared-kernel/tests/infrastructure/inbox_store_it.rs

use std::collections::HashSet;
use chrono::{Duration, Utc};
use uuid::Uuid;
use shared_kernel::domain::inbox::{InboxMessage, InboxStatus, UpdateInboxMessageParams};
use shared_kernel::domain::repositories::InboxStore;
use shared_kernel::infrastructure::postgres::{PostgresInboxStore, PostgresTransaction};
use crate::common::{insert_inbox_message, setup_postgres_test_db};

#[tokio::test]
async fn test_redelivered_message_is_stored_once() {
    let (pool, _container) = setup_postgres_test_db().await;
    let store = PostgresInboxStore::new(pool.clone());
    let id = Uuid::now_v7().to_string();

    let first = InboxMessage::received(&id, "social.events", 2, 17, b"first".to_vec(), Utc::now());
    let second = InboxMessage::received(&id, "social.events", 2, 17, b"second".to_vec(), Utc::now());

    assert!(store.save_inbox_message(None, &first).await.unwrap());
    assert!(!store.save_inbox_message(None, &second).await.unwrap());

    let rows: Vec<(Vec<u8>, i64)> = sqlx::query_as("SELECT payload, kafka_offset FROM inbox_messages WHERE id = $1")
        .bind(&id)
        .fetch_all(&pool)
        .await
        .unwrap();

    assert_eq!(rows, vec![(b"first".to_vec(), 17)]);
}

#[tokio::test]
async fn test_concurrent_workers_claim_disjoint_batches() {
    let (pool, _container) = setup_postgres_test_db().await;
    let store = PostgresInboxStore::new(pool.clone());
    let now = Utc::now();
    for i in 0..150 {
        insert_inbox_message(&pool, &format!("m-{:03}", i), InboxStatus::Received, 0, now, None).await;
    }

    let mut tx1 = PostgresTransaction::new(pool.begin().await.unwrap());
    let mut tx2 = PostgresTransaction::new(pool.begin().await.unwrap());

    let first = store.get_pending_messages_for_processing(Some(&mut tx1), 3, 100).await.unwrap();
    let second = store.get_pending_messages_for_processing(Some(&mut tx2), 3, 100).await.unwrap();

    let first_ids: HashSet<_> = first.iter().map(|m| m.id.clone()).collect();
    assert!(second.iter().all(|m| !first_ids.contains(&m.id)));
    assert_eq!(first.len() + second.len(), 150);

    tx1.into_inner().rollback().await.unwrap();
    tx2.into_inner().rollback().await.unwrap();
}

#[tokio::test]
async fn test_pending_selection_skips_processed_and_exhausted() {
    let (pool, _container) = setup_postgres_test_db().await;
    let store = PostgresInboxStore::new(pool.clone());
    let now = Utc::now();

    insert_inbox_message(&pool, "received", InboxStatus::Received, 0, now - Duration::seconds(3), None).await;
    insert_inbox_message(&pool, "retrying", InboxStatus::Failed, 2, now - Duration::seconds(2), None).await;
    insert_inbox_message(&pool, "exhausted", InboxStatus::Failed, 3, now - Duration::seconds(1), None).await;
    insert_inbox_message(&pool, "done", InboxStatus::Processed, 1, now, Some(now)).await;

    let pending = store.get_pending_messages_for_processing(None, 3, 10).await.unwrap();
    let ids: Vec<_> = pending.iter().map(|m| m.id.as_str()).collect();

    assert_eq!(ids, vec!["received", "retrying"]);
}

#[tokio::test]
async fn test_update_keeps_processed_at_unless_supplied() {
    let (pool, _container) = setup_postgres_test_db().await;
    let store = PostgresInboxStore::new(pool.clone());
    let message = InboxMessage::received("m-1", "social.events", 0, 1, vec![], Utc::now());
    store.save_inbox_message(None, &message).await.unwrap();

    store
        .update_inbox_message(None, UpdateInboxMessageParams::failed("m-1", 1, "timeout"))
        .await
        .unwrap();

    let (status, processed_at, last_error): (String, Option<chrono::DateTime<Utc>>, Option<String>) =
        sqlx::query_as("SELECT status, processed_at, last_error FROM inbox_messages WHERE id = 'm-1'")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(status, "failed");
    assert!(processed_at.is_none());
    assert_eq!(last_error.as_deref(), Some("timeout"));

    let err = store
        .update_inbox_message(None, UpdateInboxMessageParams::failed("missing", 1, "x"))
        .await
        .unwrap_err();
    assert!(matches!(err, shared_kernel::errors::DomainError::NotFound { .. }));
}

#[tokio::test]
async fn test_retention_deletes_in_bounded_batches() {
    let (pool, _container) = setup_postgres_test_db().await;
    let store = PostgresInboxStore::new(pool.clone());
    let old = Utc::now() - Duration::hours(48);

    sqlx::query(
        r#"
        INSERT INTO inbox_messages (id, topic, "partition", kafka_offset, status, attempts, received_at, processed_at)
        SELECT 'old-' || g, 'social.events', 0, g, 'processed', 1, $1, $1
        FROM generate_series(1, 2500) AS g
        "#,
    )
        .bind(old)
        .execute(&pool)
        .await
        .unwrap();
    insert_inbox_message(&pool, "fresh", InboxStatus::Processed, 1, Utc::now(), Some(Utc::now())).await;
    insert_inbox_message(&pool, "stuck", InboxStatus::Failed, 5, old, None).await;

    let mut counts = Vec::new();
    for _ in 0..4 {
        counts.push(
            store
                .delete_old_processed_messages(None, Duration::hours(24), 1000)
                .await
                .unwrap(),
        );
    }

    assert_eq!(counts, vec![1000, 1000, 500, 0]);

    let (left,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM inbox_messages")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(left, 2);
}
