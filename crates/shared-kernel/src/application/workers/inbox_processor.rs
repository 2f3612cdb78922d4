// crates/shared-kernel/src/application/workers/inbox_processor.rs

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use futures_util::FutureExt;
use tokio::sync::watch;
use tokio::time::sleep;
use crate::application::ports::InboxMessageHandler;
use crate::application::workers::configs::InboxProcessorConfig;
use crate::clock::Clock;
use crate::domain::inbox::UpdateInboxMessageParams;
use crate::domain::repositories::InboxStore;
use crate::domain::transaction::{IsolationLevel, TransactionManager, TransactionManagerExt};
use crate::errors::AppResult;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessReport {
    pub fetched: usize,
    pub processed: usize,
    pub failed: usize,
}

/// Traite les messages en attente de l'inbox.
///
/// Un tick = une transaction READ COMMITTED : lot verrouillé (SKIP LOCKED), puis
/// pour chaque message `processing` + tentative, appel du handler et `processed`
/// ou `failed`. Une panique du handler est rattrapée et traitée comme un échec.
pub struct InboxProcessor {
    store: Arc<dyn InboxStore>,
    tx_manager: Arc<dyn TransactionManager>,
    handler: Arc<dyn InboxMessageHandler>,
    clock: Arc<dyn Clock>,
    config: InboxProcessorConfig,
}

impl InboxProcessor {
    pub fn new(
        store: Arc<dyn InboxStore>,
        tx_manager: Arc<dyn TransactionManager>,
        handler: Arc<dyn InboxMessageHandler>,
        clock: Arc<dyn Clock>,
        config: InboxProcessorConfig,
    ) -> Self {
        Self {
            store,
            tx_manager,
            handler,
            clock,
            config,
        }
    }

    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        tracing::info!(
            batch_size = self.config.batch_size,
            max_attempts = self.config.max_attempts,
            "Inbox processor started"
        );

        loop {
            if *shutdown.borrow() {
                break;
            }

            let fetched = match self.process_pending().await {
                Ok(report) => {
                    if report.fetched > 0 {
                        tracing::info!(
                            fetched = report.fetched,
                            processed = report.processed,
                            failed = report.failed,
                            "Inbox tick done"
                        );
                    }
                    report.fetched
                }
                Err(e) => {
                    tracing::error!(error = %e, "Inbox tick failed");
                    0
                }
            };

            if (fetched as i64) < self.config.batch_size {
                tokio::select! {
                    _ = sleep(self.config.poll_interval) => {},
                    _ = shutdown.changed() => break,
                }
            }
        }

        tracing::info!("Inbox processor stopped gracefully");
    }

    pub async fn process_pending(&self) -> AppResult<ProcessReport> {
        let store = self.store.clone();
        let handler = self.handler.clone();
        let clock = self.clock.clone();
        let config = self.config.clone();

        let report = self
            .tx_manager
            .run_in_transaction(IsolationLevel::ReadCommitted, move |tx| {
                Box::pin(async move {
                    let messages = store
                        .get_pending_messages_for_processing(
                            Some(&mut *tx),
                            config.max_attempts,
                            config.batch_size,
                        )
                        .await?;

                    let mut report = ProcessReport {
                        fetched: messages.len(),
                        ..ProcessReport::default()
                    };

                    for message in messages {
                        let start = UpdateInboxMessageParams::processing(&message);
                        let attempts = start.attempts;
                        store.update_inbox_message(Some(&mut *tx), start).await?;

                        let outcome = AssertUnwindSafe(handler.handle(&message))
                            .catch_unwind()
                            .await;

                        let params = match outcome {
                            Ok(Ok(())) => {
                                report.processed += 1;
                                UpdateInboxMessageParams::processed(&message.id, attempts, clock.now())
                            }
                            Ok(Err(e)) => {
                                report.failed += 1;
                                tracing::warn!(
                                    message_id = %message.id,
                                    attempts,
                                    error = %e,
                                    "Inbox message handling failed"
                                );
                                UpdateInboxMessageParams::failed(&message.id, attempts, e.to_string())
                            }
                            Err(panic) => {
                                report.failed += 1;
                                let reason = panic_message(panic.as_ref());
                                tracing::error!(
                                    message_id = %message.id,
                                    attempts,
                                    %reason,
                                    "Inbox message handler panicked"
                                );
                                UpdateInboxMessageParams::failed(&message.id, attempts, format!("panic: {}", reason))
                            }
                        };

                        store.update_inbox_message(Some(&mut *tx), params).await?;
                    }

                    Ok(report)
                })
            })
            .await?;

        Ok(report)
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
