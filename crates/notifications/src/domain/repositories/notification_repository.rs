// crates/notifications/src/domain/repositories/notification_repository.rs

use async_trait::async_trait;
use shared_kernel::errors::Result;
use crate::domain::entities::Notification;

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Insère la notification si aucune n'existe déjà pour `source_event_id`.
    /// Renvoie `false` sur un rejeu.
    async fn save(&self, notification: &Notification) -> Result<bool>;

    /// Notifications d'un destinataire, plus récentes d'abord.
    async fn find_by_recipient(&self, recipient_id: &str, limit: i64) -> Result<Vec<Notification>>;
}
