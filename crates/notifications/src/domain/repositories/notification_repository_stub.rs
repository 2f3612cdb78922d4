use std::sync::Mutex;
use async_trait::async_trait;
use shared_kernel::errors::{DomainError, Result};
use crate::domain::entities::Notification;
use crate::domain::repositories::NotificationRepository;

#[derive(Default)]
pub struct NotificationRepositoryStub {
    pub notifications: Mutex<Vec<Notification>>,
    pub error_to_return: Mutex<Option<DomainError>>,
}

impl NotificationRepositoryStub {
    pub fn saved(&self) -> Vec<Notification> {
        self.notifications.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn fail_with(&self, error: DomainError) {
        *self.error_to_return.lock().unwrap_or_else(|e| e.into_inner()) = Some(error);
    }

    fn check_error(&self) -> Result<()> {
        match self.error_to_return.lock().unwrap_or_else(|e| e.into_inner()).clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl NotificationRepository for NotificationRepositoryStub {
    async fn save(&self, notification: &Notification) -> Result<bool> {
        self.check_error()?;
        let mut store = self.notifications.lock().unwrap_or_else(|e| e.into_inner());
        if store.iter().any(|n| n.source_event_id == notification.source_event_id) {
            return Ok(false);
        }
        store.push(notification.clone());
        Ok(true)
    }

    async fn find_by_recipient(&self, recipient_id: &str, limit: i64) -> Result<Vec<Notification>> {
        self.check_error()?;
        let mut found: Vec<_> = self
            .saved()
            .into_iter()
            .filter(|n| n.recipient_id == recipient_id)
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        found.truncate(limit.max(0) as usize);
        Ok(found)
    }
}
