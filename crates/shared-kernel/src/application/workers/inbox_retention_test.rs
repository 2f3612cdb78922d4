#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;
    use chrono::Utc;
    use tokio::sync::watch;
    use crate::application::workers::InboxRetentionWorker;
    use crate::application::workers::configs::InboxRetentionConfig;
    use crate::clock::FixedClock;
    use crate::domain::inbox::{InboxMessage, InboxStatus};
    use crate::domain::repositories::InboxStore;
    use crate::errors::{DomainError, ErrorCode};
    use crate::infrastructure::memory::{InMemoryInboxStore, RowLocks};

    fn store_with(processed_old: usize, processed_recent: usize, pending_old: usize) -> Arc<InMemoryInboxStore> {
        let now = Utc::now();
        let store = Arc::new(
            InMemoryInboxStore::new(Arc::new(RowLocks::new())).with_clock(Arc::new(FixedClock::new(now))),
        );

        let add = |prefix: &str, count: usize, status: InboxStatus, age: chrono::Duration| {
            for i in 0..count {
                let mut message = InboxMessage::received(
                    format!("{}-{}", prefix, i),
                    "social.events",
                    0,
                    i as i64,
                    vec![],
                    now - age,
                );
                message.status = status;
                if status == InboxStatus::Processed {
                    message.processed_at = Some(now - age);
                }
                store.insert(message);
            }
        };

        add("old", processed_old, InboxStatus::Processed, chrono::Duration::hours(48));
        add("recent", processed_recent, InboxStatus::Processed, chrono::Duration::hours(1));
        add("pending", pending_old, InboxStatus::Failed, chrono::Duration::hours(48));

        store
    }

    #[tokio::test]
    async fn test_deletes_in_bounded_batches() {
        let store = store_with(2500, 0, 0);

        let deleted: Vec<u64> = {
            let mut counts = Vec::new();
            for _ in 0..4 {
                counts.push(
                    store
                        .delete_old_processed_messages(None, chrono::Duration::hours(24), 1000)
                        .await
                        .unwrap(),
                );
            }
            counts
        };

        assert_eq!(deleted, vec![1000, 1000, 500, 0]);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_purge_loops_until_a_partial_batch() {
        let store = store_with(25, 5, 3);
        let worker = InboxRetentionWorker::new(
            store.clone(),
            InboxRetentionConfig::default()
                .with_retention_period(Duration::from_secs(24 * 3600))
                .with_batch_size(10)
                .with_pause_between_batches(Duration::from_millis(1)),
        );
        let (_tx, rx) = watch::channel(false);

        let total = worker.purge(&rx).await.unwrap();

        assert_eq!(total, 25);
        // Récents et non traités restent
        assert_eq!(store.len(), 8);
        assert!(store.get("recent-0").is_some());
        assert!(store.get("pending-0").is_some());
    }

    #[tokio::test]
    async fn test_purge_stops_between_batches_on_shutdown() {
        let store = store_with(30, 0, 0);
        let worker = InboxRetentionWorker::new(
            store.clone(),
            InboxRetentionConfig::default()
                .with_retention_period(Duration::from_secs(3600))
                .with_batch_size(10),
        );
        let (tx, rx) = watch::channel(false);
        tx.send(true).unwrap();

        let total = worker.purge(&rx).await.unwrap();

        // Le lot en cours est conservé, les suivants ne sont pas lancés
        assert_eq!(total, 10);
        assert_eq!(store.len(), 20);
    }

    #[tokio::test]
    async fn test_storage_error_is_reported() {
        let store = store_with(5, 0, 0);
        store.fail_with(Some(DomainError::Infrastructure("connection refused".into())));
        let worker = InboxRetentionWorker::new(store.clone(), InboxRetentionConfig::default());
        let (_tx, rx) = watch::channel(false);

        let err = worker.purge(&rx).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::InfrastructureFailure);
        assert_eq!(store.len(), 5);
    }
}
