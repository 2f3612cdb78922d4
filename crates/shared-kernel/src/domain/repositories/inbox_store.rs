// crates/shared-kernel/src/domain/repositories/inbox_store.rs

use async_trait::async_trait;
use chrono::Duration;
use crate::domain::inbox::{InboxMessage, UpdateInboxMessageParams};
use crate::domain::transaction::Transaction;
use crate::errors::Result;

#[async_trait]
pub trait InboxStore: Send + Sync {
    /// Insertion idempotente sur l'id : `Ok(false)` si le message existait déjà.
    async fn save_inbox_message(
        &self,
        tx: Option<&mut dyn Transaction>,
        message: &InboxMessage,
    ) -> Result<bool>;

    /// Messages non traités avec `attempts < max_attempts`, par `received_at` croissant.
    /// Dans une transaction, les lignes sont verrouillées et celles déjà prises par
    /// un autre worker sont ignorées.
    async fn get_pending_messages_for_processing(
        &self,
        tx: Option<&mut dyn Transaction>,
        max_attempts: i32,
        batch_size: i64,
    ) -> Result<Vec<InboxMessage>>;

    async fn update_inbox_message(
        &self,
        tx: Option<&mut dyn Transaction>,
        params: UpdateInboxMessageParams,
    ) -> Result<()>;

    /// Supprime au plus `batch_size` messages `processed` plus vieux que `retention`.
    /// Retourne le nombre de lignes supprimées.
    async fn delete_old_processed_messages(
        &self,
        tx: Option<&mut dyn Transaction>,
        retention: Duration,
        batch_size: i64,
    ) -> Result<u64>;
}
