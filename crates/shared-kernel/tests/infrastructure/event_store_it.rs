// crates/shared-kernel/tests/infrastructure/event_store_it.rs

use std::collections::HashSet;
use chrono::{Duration, Utc};
use shared_kernel::domain::outbox::{OutboxEvent, SearchEventsOptions, UpdateEventsOptions};
use shared_kernel::domain::repositories::EventStore;
use shared_kernel::errors::DomainError;
use shared_kernel::infrastructure::postgres::{PostgresEventStore, PostgresTransaction};
use crate::common::setup_postgres_test_db;

async fn save(store: &PostgresEventStore, pool: &sqlx::PgPool, event: &OutboxEvent) {
    let mut tx = PostgresTransaction::new(pool.begin().await.unwrap());
    store.save_event(&mut tx, event).await.expect("Save failed");
    tx.into_inner().commit().await.unwrap();
}

#[tokio::test]
async fn test_published_event_is_never_selected_again() {
    let (pool, _container) = setup_postgres_test_db().await;
    let store = PostgresEventStore::new(pool.clone());
    let event = OutboxEvent::new("friend_request", "42", "FriendRequestCreated", b"{}".to_vec());
    save(&store, &pool, &event).await;

    let found = store
        .search_events(None, SearchEventsOptions::new().only_unpublished().with_limit(10))
        .await;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0], event_from_db_view(&event));

    let now = Utc::now();
    let updated = store
        .update_events(None, UpdateEventsOptions::for_ids(vec![event.id]).only_unpublished().set_published_at(now))
        .await
        .unwrap();
    assert_eq!(updated, 1);

    let found = store
        .search_events(None, SearchEventsOptions::new().only_unpublished())
        .await;
    assert!(found.is_empty());

    // Monotonie : une seconde publication ne touche plus la ligne
    let updated = store
        .update_events(
            None,
            UpdateEventsOptions::for_ids(vec![event.id]).only_unpublished().set_published_at(now + Duration::hours(1)),
        )
        .await
        .unwrap();
    assert_eq!(updated, 0);
}

/// Postgres tronque à la microseconde
fn event_from_db_view(event: &OutboxEvent) -> OutboxEvent {
    let mut expected = event.clone();
    expected.created_at = chrono::DateTime::from_timestamp_micros(event.created_at.timestamp_micros()).unwrap();
    expected
}

#[tokio::test]
async fn test_failed_event_waits_for_its_next_attempt() {
    let (pool, _container) = setup_postgres_test_db().await;
    let store = PostgresEventStore::new(pool.clone());
    let event = OutboxEvent::new("friend_request", "42", "FriendRequestCreated", vec![]);
    save(&store, &pool, &event).await;

    let now = Utc::now();
    store
        .update_events(
            None,
            UpdateEventsOptions::for_ids(vec![event.id])
                .inc_retry_by(1)
                .set_next_attempt_at(now + Duration::seconds(30)),
        )
        .await
        .unwrap();

    let due_now = store.search_events(None, SearchEventsOptions::new().due_at(now)).await;
    assert!(due_now.is_empty());

    let due_later = store
        .search_events(None, SearchEventsOptions::new().due_at(now + Duration::seconds(30)))
        .await;
    assert_eq!(due_later.len(), 1);
    assert_eq!(due_later[0].retry_count, 1);

    let capped = store
        .search_events(None, SearchEventsOptions::new().with_max_retry_count(0))
        .await;
    assert!(capped.is_empty());
}

#[tokio::test]
async fn test_concurrent_locking_searches_never_overlap() {
    let (pool, _container) = setup_postgres_test_db().await;
    let store = PostgresEventStore::new(pool.clone());
    for i in 0..5 {
        let event = OutboxEvent::new("friend_request", i.to_string(), "FriendRequestCreated", vec![]);
        save(&store, &pool, &event).await;
    }

    let options = SearchEventsOptions::new().only_unpublished().with_limit(3).locked();

    let mut tx1 = PostgresTransaction::new(pool.begin().await.unwrap());
    let mut tx2 = PostgresTransaction::new(pool.begin().await.unwrap());

    let first = store.search_events(Some(&mut tx1), options.clone()).await;
    let second = store.search_events(Some(&mut tx2), options).await;

    assert_eq!(first.len(), 3);
    assert_eq!(second.len(), 2);

    let first_ids: HashSet<_> = first.iter().map(|e| e.id).collect();
    assert!(second.iter().all(|e| !first_ids.contains(&e.id)));

    tx1.into_inner().rollback().await.unwrap();
    tx2.into_inner().rollback().await.unwrap();
}

#[tokio::test]
async fn test_updates_stay_inside_the_selection_scope() {
    let (pool, _container) = setup_postgres_test_db().await;
    let store = PostgresEventStore::new(pool.clone());

    let recent = OutboxEvent::new("friend_request", "1", "FriendRequestCreated", vec![]);
    let old = OutboxEvent::new("friend_request", "2", "FriendRequestCreated", vec![])
        .with_created_at(Utc::now() - Duration::days(3));
    let chat = OutboxEvent::new("chat", "3", "ChatCreated", vec![]);
    for event in [&recent, &old, &chat] {
        save(&store, &pool, event).await;
    }

    let now = Utc::now();
    let updated = store
        .update_events(
            None,
            UpdateEventsOptions::for_ids(vec![recent.id, old.id, chat.id])
                .with_aggregate_type(Some("friend_request".into()))
                .with_window(now - Duration::days(1), now)
                .set_published_at(now),
        )
        .await
        .unwrap();

    assert_eq!(updated, 1);

    let remaining = store
        .search_events(None, SearchEventsOptions::new().only_unpublished())
        .await;
    let ids: Vec<_> = remaining.iter().map(|e| e.id).collect();
    // Tri par created_at croissant
    assert_eq!(ids, vec![old.id, chat.id]);
}

#[tokio::test]
async fn test_update_without_mutation_or_ids_is_a_no_op() {
    let (pool, _container) = setup_postgres_test_db().await;
    let store = PostgresEventStore::new(pool.clone());
    let event = OutboxEvent::new("friend_request", "42", "FriendRequestCreated", vec![]);
    save(&store, &pool, &event).await;

    let none = store
        .update_events(None, UpdateEventsOptions::for_ids(vec![event.id]))
        .await
        .unwrap();
    let empty_ids = store
        .update_events(None, UpdateEventsOptions::for_ids(vec![]).set_published_at(Utc::now()))
        .await
        .unwrap();

    assert_eq!(none, 0);
    assert_eq!(empty_ids, 0);
}

#[tokio::test]
async fn test_duplicate_event_id_is_a_conflict() {
    let (pool, _container) = setup_postgres_test_db().await;
    let store = PostgresEventStore::new(pool.clone());
    let event = OutboxEvent::new("friend_request", "42", "FriendRequestCreated", vec![]);
    save(&store, &pool, &event).await;

    let mut tx = PostgresTransaction::new(pool.begin().await.unwrap());
    let err = store.save_event(&mut tx, &event).await.unwrap_err();

    assert!(matches!(err, DomainError::AlreadyExists { field: "id", .. }));
}
