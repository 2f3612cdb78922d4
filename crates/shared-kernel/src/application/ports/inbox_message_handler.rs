// crates/shared-kernel/src/application/ports/inbox_message_handler.rs

use async_trait::async_trait;
use crate::domain::inbox::InboxMessage;
use crate::errors::AppResult;

/// Traitement métier d'un message inbox.
///
/// Doit être idempotent : en at-least-once, un même message peut être traité
/// plusieurs fois (redémarrage en plein traitement, rejeu après échec).
#[async_trait]
pub trait InboxMessageHandler: Send + Sync {
    async fn handle(&self, message: &InboxMessage) -> AppResult<()>;
}
