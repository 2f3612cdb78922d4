// crates/shared-kernel/tests/infrastructure/transaction_manager_it.rs

use std::sync::Arc;
use shared_kernel::domain::outbox::{OutboxEvent, SearchEventsOptions};
use shared_kernel::domain::repositories::EventStore;
use shared_kernel::domain::transaction::{IsolationLevel, TransactionManagerExt};
use shared_kernel::errors::DomainError;
use shared_kernel::infrastructure::postgres::{PostgresEventStore, PostgresTransactionManager};
use crate::common::setup_postgres_test_db;

#[tokio::test]
async fn test_work_is_committed_on_success() {
    let (pool, _container) = setup_postgres_test_db().await;
    let store = Arc::new(PostgresEventStore::new(pool.clone()));
    let manager = PostgresTransactionManager::new(pool.clone());
    let event = OutboxEvent::new("friend_request", "42", "FriendRequestCreated", vec![]);

    let store_tx = store.clone();
    let saved = event.clone();
    let id = manager
        .run_in_transaction(IsolationLevel::RepeatableRead, move |tx| {
            Box::pin(async move {
                store_tx.save_event(tx, &saved).await?;
                Ok(saved.id)
            })
        })
        .await
        .unwrap();

    assert_eq!(id, event.id);
    assert_eq!(store.search_events(None, SearchEventsOptions::new()).await.len(), 1);
}

#[tokio::test]
async fn test_work_is_rolled_back_on_error() {
    let (pool, _container) = setup_postgres_test_db().await;
    let store = Arc::new(PostgresEventStore::new(pool.clone()));
    let manager = PostgresTransactionManager::new(pool.clone());
    let event = OutboxEvent::new("friend_request", "42", "FriendRequestCreated", vec![]);

    let store_tx = store.clone();
    let result: Result<(), DomainError> = manager
        .run_in_transaction(IsolationLevel::ReadCommitted, move |tx| {
            Box::pin(async move {
                store_tx.save_event(tx, &event).await?;
                Err(DomainError::Internal("business rule violated".into()))
            })
        })
        .await;

    assert!(result.is_err());
    assert!(store.search_events(None, SearchEventsOptions::new()).await.is_empty());
}
