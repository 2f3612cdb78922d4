#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use async_trait::async_trait;
    use chrono::Utc;
    use tokio::sync::watch;
    use crate::application::ports::InboxMessageHandler;
    use crate::application::workers::InboxProcessor;
    use crate::application::workers::configs::InboxProcessorConfig;
    use crate::clock::{Clock, FixedClock};
    use crate::domain::inbox::{InboxMessage, InboxStatus};
    use crate::errors::{AppError, AppResult, DomainError, ErrorCode};
    use crate::infrastructure::memory::{InMemoryInboxStore, InMemoryTransactionManager, RowLocks};

    /// Handler scripté par le contenu du payload : "ok", "fail" ou "panic".
    #[derive(Default)]
    struct ScriptedHandler {
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl InboxMessageHandler for ScriptedHandler {
        async fn handle(&self, message: &InboxMessage) -> AppResult<()> {
            self.seen.lock().unwrap().push(message.id.clone());
            match message.payload.as_slice() {
                b"fail" => Err(AppError::new(ErrorCode::ValidationFailed, "unknown receiver")),
                b"panic" => panic!("corrupted state"),
                b"malformed" => Err(DomainError::Validation {
                    field: "payload",
                    reason: "Malformed friend request event: expected value at line 1".into(),
                }
                .into()),
                _ => Ok(()),
            }
        }
    }

    struct Fixture {
        store: Arc<InMemoryInboxStore>,
        handler: Arc<ScriptedHandler>,
        clock: Arc<FixedClock>,
        processor: InboxProcessor,
    }

    fn setup(config: InboxProcessorConfig) -> Fixture {
        let locks = Arc::new(RowLocks::new());
        let store = Arc::new(InMemoryInboxStore::new(locks.clone()));
        let handler = Arc::new(ScriptedHandler::default());
        let clock = Arc::new(FixedClock::new(Utc::now()));

        let processor = InboxProcessor::new(
            store.clone(),
            Arc::new(InMemoryTransactionManager::new(locks)),
            handler.clone(),
            clock.clone(),
            config,
        );

        Fixture { store, handler, clock, processor }
    }

    fn add(fx: &Fixture, id: &str, payload: &[u8], offset: i64) {
        fx.store.insert(InboxMessage::received(
            id,
            "social.events",
            0,
            offset,
            payload.to_vec(),
            fx.clock.now() + chrono::Duration::milliseconds(offset),
        ));
    }

    #[tokio::test]
    async fn test_successful_message_is_marked_processed() {
        let fx = setup(InboxProcessorConfig::default());
        add(&fx, "m-1", b"ok", 0);

        let report = fx.processor.process_pending().await.unwrap();

        assert_eq!(report.processed, 1);
        let stored = fx.store.get("m-1").unwrap();
        assert_eq!(stored.status, InboxStatus::Processed);
        assert!(stored.is_processed());
        assert_eq!(stored.attempts, 1);
        assert_eq!(stored.processed_at, Some(fx.clock.now()));
        assert!(stored.last_error.is_none());

        // Terminé : plus jamais repris
        let again = fx.processor.process_pending().await.unwrap();
        assert_eq!(again.fetched, 0);
    }

    #[tokio::test]
    async fn test_failures_and_panics_do_not_abort_siblings() {
        let fx = setup(InboxProcessorConfig::default());
        add(&fx, "m-fail", b"fail", 0);
        add(&fx, "m-panic", b"panic", 1);
        add(&fx, "m-ok", b"ok", 2);

        let report = fx.processor.process_pending().await.unwrap();

        assert_eq!(report.fetched, 3);
        assert_eq!(report.processed, 1);
        assert_eq!(report.failed, 2);

        let failed = fx.store.get("m-fail").unwrap();
        assert_eq!(failed.status, InboxStatus::Failed);
        assert!(failed.processed_at.is_none());
        assert!(failed.last_error.unwrap().contains("unknown receiver"));

        let panicked = fx.store.get("m-panic").unwrap();
        assert_eq!(panicked.status, InboxStatus::Failed);
        assert_eq!(panicked.last_error.as_deref(), Some("panic: corrupted state"));

        assert_eq!(fx.store.get("m-ok").unwrap().status, InboxStatus::Processed);
        assert_eq!(*fx.handler.seen.lock().unwrap(), vec!["m-fail", "m-panic", "m-ok"]);
    }

    #[tokio::test]
    async fn test_validation_reason_is_recorded_in_last_error() {
        let fx = setup(InboxProcessorConfig::default());
        add(&fx, "m-bad", b"malformed", 0);

        let report = fx.processor.process_pending().await.unwrap();

        assert_eq!(report.failed, 1);
        let stored = fx.store.get("m-bad").unwrap();
        assert!(!stored.is_processed());
        let last_error = stored.last_error.unwrap();
        assert!(last_error.contains("payload"));
        assert!(last_error.contains("Malformed friend request event"));
    }

    #[tokio::test]
    async fn test_failed_message_is_retried_until_max_attempts() {
        let fx = setup(InboxProcessorConfig::default().with_max_attempts(3));
        add(&fx, "m-1", b"fail", 0);

        for expected_attempts in 1..=3 {
            let report = fx.processor.process_pending().await.unwrap();
            assert_eq!(report.failed, 1);
            assert_eq!(fx.store.get("m-1").unwrap().attempts, expected_attempts);
        }

        // Plafond atteint : exclu de la sélection mais toujours stocké
        let report = fx.processor.process_pending().await.unwrap();
        assert_eq!(report.fetched, 0);
        assert_eq!(fx.store.get("m-1").unwrap().status, InboxStatus::Failed);
    }

    #[tokio::test]
    async fn test_batch_size_bounds_each_tick() {
        let fx = setup(InboxProcessorConfig::default().with_batch_size(2));
        for i in 0..5 {
            add(&fx, &format!("m-{}", i), b"ok", i);
        }

        let first = fx.processor.process_pending().await.unwrap();
        assert_eq!(first.fetched, 2);
        // Les plus anciens d'abord
        assert_eq!(*fx.handler.seen.lock().unwrap(), vec!["m-0", "m-1"]);
    }

    #[tokio::test]
    async fn test_run_drains_backlog_then_stops_on_shutdown() {
        let fx = setup(
            InboxProcessorConfig::default()
                .with_batch_size(2)
                .with_poll_interval(Duration::from_millis(10)),
        );
        for i in 0..5 {
            add(&fx, &format!("m-{}", i), b"ok", i);
        }
        let store = fx.store.clone();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let handle = tokio::spawn(async move { fx.processor.run(shutdown_rx).await });
        tokio::time::sleep(Duration::from_millis(100)).await;
        shutdown_tx.send(true).unwrap();

        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("processor did not stop")
            .unwrap();

        for i in 0..5 {
            assert_eq!(store.get(&format!("m-{}", i)).unwrap().status, InboxStatus::Processed);
        }
    }
}
