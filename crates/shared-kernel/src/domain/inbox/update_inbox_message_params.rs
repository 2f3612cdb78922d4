// crates/shared-kernel/src/domain/inbox/update_inbox_message_params.rs

use chrono::{DateTime, Utc};
use crate::domain::inbox::{InboxMessage, InboxStatus};

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateInboxMessageParams {
    pub id: String,
    pub status: InboxStatus,
    pub attempts: i32,
    pub last_error: Option<String>,
    /// `None` conserve la valeur existante
    pub processed_at: Option<DateTime<Utc>>,
}

impl UpdateInboxMessageParams {
    /// Début d'une tentative : compteur incrémenté, erreur précédente conservée.
    pub fn processing(message: &InboxMessage) -> Self {
        Self {
            id: message.id.clone(),
            status: InboxStatus::Processing,
            attempts: message.attempts + 1,
            last_error: message.last_error.clone(),
            processed_at: None,
        }
    }

    pub fn processed(id: impl Into<String>, attempts: i32, at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            status: InboxStatus::Processed,
            attempts,
            last_error: None,
            processed_at: Some(at),
        }
    }

    pub fn failed(id: impl Into<String>, attempts: i32, error: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: InboxStatus::Failed,
            attempts,
            last_error: Some(error.into()),
            processed_at: None,
        }
    }

    pub fn apply(&self, message: &mut InboxMessage) {
        message.status = self.status;
        message.attempts = self.attempts;
        message.last_error = self.last_error.clone();
        if let Some(at) = self.processed_at {
            message.processed_at = Some(at);
        }
    }
}
