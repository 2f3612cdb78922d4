// crates/shared-kernel/src/application/workers/outbox_publisher.rs

use std::sync::Arc;
use tokio::sync::watch;
use tokio::time::sleep;
use crate::application::ports::BatchPublishHandler;
use crate::application::workers::configs::OutboxPublisherConfig;
use crate::clock::Clock;
use crate::domain::outbox::{SearchEventsOptions, UpdateEventsOptions};
use crate::domain::repositories::EventStore;
use crate::domain::transaction::{IsolationLevel, TransactionManager, TransactionManagerExt};
use crate::errors::{AppResult, DomainError};

/// Bilan d'un cycle de publication.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishReport {
    pub selected: usize,
    pub published: u64,
    pub failed: u64,
}

/// Relais outbox -> broker.
///
/// Chaque cycle est une transaction REPEATABLE READ : sélection verrouillante des
/// événements dus, envoi du lot, puis marquage des succès et des échecs avec les
/// mêmes filtres que la sélection. Plusieurs instances peuvent tourner en
/// parallèle, SKIP LOCKED leur donne des lots disjoints.
pub struct OutboxPublisher {
    store: Arc<dyn EventStore>,
    tx_manager: Arc<dyn TransactionManager>,
    handler: Arc<dyn BatchPublishHandler>,
    clock: Arc<dyn Clock>,
    config: OutboxPublisherConfig,
}

impl OutboxPublisher {
    pub fn new(
        store: Arc<dyn EventStore>,
        tx_manager: Arc<dyn TransactionManager>,
        handler: Arc<dyn BatchPublishHandler>,
        clock: Arc<dyn Clock>,
        config: OutboxPublisherConfig,
    ) -> Self {
        Self {
            store,
            tx_manager,
            handler,
            clock,
            config,
        }
    }

    pub fn config(&self) -> &OutboxPublisherConfig {
        &self.config
    }

    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        tracing::info!(
            aggregate_type = self.config.aggregate_type.as_deref().unwrap_or("*"),
            batch_size = self.config.batch_size,
            "Outbox publisher started"
        );

        loop {
            if *shutdown.borrow() {
                break;
            }

            let selected = match self.publish_due_events().await {
                Ok(report) => {
                    if report.selected > 0 {
                        tracing::info!(
                            selected = report.selected,
                            published = report.published,
                            failed = report.failed,
                            "Outbox cycle done"
                        );
                    }
                    report.selected
                }
                Err(e) => {
                    tracing::error!(error = %e, "Outbox cycle failed");
                    0
                }
            };

            // Lot complet : on reboucle tout de suite pour vider le backlog
            if (selected as i64) < self.config.batch_size {
                tokio::select! {
                    _ = sleep(self.config.poll_interval) => {},
                    _ = shutdown.changed() => break,
                }
            }
        }

        tracing::info!("Outbox publisher stopped gracefully");
    }

    /// Un cycle complet : sélection, envoi, marquage.
    pub async fn publish_due_events(&self) -> AppResult<PublishReport> {
        let now = self.clock.now();
        let not_before = now - to_chrono(self.config.window);
        let next_attempt_at = now + to_chrono(self.config.retry_interval);

        let store = self.store.clone();
        let handler = self.handler.clone();
        let config = self.config.clone();

        let report = self
            .tx_manager
            .run_in_transaction(IsolationLevel::RepeatableRead, move |tx| {
                Box::pin(async move {
                    let mut search = SearchEventsOptions::new()
                        .with_window(not_before, now)
                        .only_unpublished()
                        .due_at(now)
                        .with_max_retry_count(config.max_retries)
                        .with_limit(config.batch_size)
                        .locked();
                    if let Some(aggregate_type) = &config.aggregate_type {
                        search = search.with_aggregate_type(aggregate_type.clone());
                    }

                    let events = store.search_events(Some(&mut *tx), search).await;
                    if events.is_empty() {
                        return Ok(PublishReport::default());
                    }

                    // Erreur de lot : rollback, rien n'est marqué, tout est rejoué au prochain cycle
                    let outcome = handler
                        .handle_batch(&events)
                        .await
                        .map_err(|e| DomainError::Infrastructure(e.message))?;

                    let scope = |ids| {
                        UpdateEventsOptions::for_ids(ids)
                            .with_aggregate_type(config.aggregate_type.clone())
                            .with_window(not_before, now)
                            .only_unpublished()
                    };

                    let mut report = PublishReport {
                        selected: events.len(),
                        ..PublishReport::default()
                    };
                    let mut errors = Vec::new();

                    if !outcome.succeeded.is_empty() {
                        match store
                            .update_events(Some(&mut *tx), scope(outcome.succeeded).set_published_at(now))
                            .await
                        {
                            Ok(count) => report.published = count,
                            Err(e) => errors.push(e),
                        }
                    }

                    if !outcome.failed.is_empty() {
                        match store
                            .update_events(
                                Some(&mut *tx),
                                scope(outcome.failed).inc_retry_by(1).set_next_attempt_at(next_attempt_at),
                            )
                            .await
                        {
                            Ok(count) => report.failed = count,
                            Err(e) => errors.push(e),
                        }
                    }

                    match DomainError::join(errors) {
                        Some(e) => Err(e),
                        None => Ok(report),
                    }
                })
            })
            .await?;

        Ok(report)
    }
}

pub(crate) fn to_chrono(duration: std::time::Duration) -> chrono::Duration {
    chrono::Duration::from_std(duration).unwrap_or_else(|_| chrono::Duration::days(36_500))
}
