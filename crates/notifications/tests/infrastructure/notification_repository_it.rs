// crates/notifications/tests/infrastructure/notification_repository_it.rs

use chrono::{Duration, Utc};
use notifications::domain::entities::{Notification, NotificationKind};
use notifications::domain::repositories::NotificationRepository;
use notifications::infrastructure::postgres::PostgresNotificationRepository;
use shared_kernel::infrastructure::postgres::utils::setup_test_postgres;

const SCHEMA: &str = include_str!("../../migrations/postgres/202601020000_notifications.sql");

#[tokio::test]
async fn test_one_notification_per_source_event() {
    let (pool, _container) = setup_test_postgres(&[SCHEMA]).await;
    let repo = PostgresNotificationRepository::new(pool);

    let first = Notification::new("bob", NotificationKind::FriendRequestReceived, "alice", "evt-1", Utc::now());
    let replay = Notification::new("bob", NotificationKind::FriendRequestReceived, "alice", "evt-1", Utc::now());

    assert!(repo.save(&first).await.unwrap());
    assert!(!repo.save(&replay).await.unwrap());

    let found = repo.find_by_recipient("bob", 10).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, first.id);
    assert_eq!(found[0].kind, NotificationKind::FriendRequestReceived);
}

#[tokio::test]
async fn test_find_by_recipient_returns_newest_first() {
    let (pool, _container) = setup_test_postgres(&[SCHEMA]).await;
    let repo = PostgresNotificationRepository::new(pool);
    let now = Utc::now();

    let older = Notification::new("alice", NotificationKind::FriendRequestAccepted, "bob", "evt-1", now - Duration::minutes(5));
    let newer = Notification::new("alice", NotificationKind::FriendRequestDeclined, "carol", "evt-2", now);
    let other = Notification::new("bob", NotificationKind::FriendRequestReceived, "alice", "evt-3", now);
    for n in [&older, &newer, &other] {
        repo.save(n).await.unwrap();
    }

    let found = repo.find_by_recipient("alice", 10).await.unwrap();
    let ids: Vec<_> = found.iter().map(|n| n.id).collect();
    assert_eq!(ids, vec![newer.id, older.id]);

    assert_eq!(repo.find_by_recipient("alice", 1).await.unwrap().len(), 1);
}
