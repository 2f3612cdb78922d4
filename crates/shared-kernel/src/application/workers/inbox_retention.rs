// crates/shared-kernel/src/application/workers/inbox_retention.rs

use std::sync::Arc;
use tokio::sync::watch;
use tokio::time::sleep;
use crate::application::workers::configs::InboxRetentionConfig;
use crate::application::workers::outbox_publisher::to_chrono;
use crate::domain::repositories::InboxStore;
use crate::errors::AppResult;

/// Purge des messages `processed` plus vieux que la rétention, par lots bornés.
/// Chaque lot est sa propre transaction : un arrêt en cours de purge garde le
/// travail déjà fait.
pub struct InboxRetentionWorker {
    store: Arc<dyn InboxStore>,
    config: InboxRetentionConfig,
}

impl InboxRetentionWorker {
    pub fn new(store: Arc<dyn InboxStore>, config: InboxRetentionConfig) -> Self {
        Self { store, config }
    }

    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        tracing::info!(
            retention_secs = self.config.retention_period.as_secs(),
            batch_size = self.config.batch_size,
            "Inbox retention worker started"
        );

        loop {
            if *shutdown.borrow() {
                break;
            }

            match self.purge(&shutdown).await {
                Ok(0) => tracing::debug!("Inbox retention: nothing to delete"),
                Ok(deleted) => tracing::info!(deleted, "Inbox retention pass done"),
                Err(e) => tracing::error!(error = %e, "Inbox retention pass failed"),
            }

            tokio::select! {
                _ = sleep(self.config.interval) => {},
                _ = shutdown.changed() => break,
            }
        }

        tracing::info!("Inbox retention worker stopped gracefully");
    }

    /// Supprime lot par lot jusqu'à un lot incomplet. Retourne le total supprimé.
    pub async fn purge(&self, shutdown: &watch::Receiver<bool>) -> AppResult<u64> {
        let retention = to_chrono(self.config.retention_period);
        let mut total = 0;

        loop {
            let deleted = self
                .store
                .delete_old_processed_messages(None, retention, self.config.batch_size)
                .await?;
            total += deleted;

            if (deleted as i64) < self.config.batch_size {
                break;
            }
            if *shutdown.borrow() {
                tracing::info!(total, "Inbox retention interrupted by shutdown");
                break;
            }

            sleep(self.config.pause_between_batches).await;
        }

        Ok(total)
    }
}
