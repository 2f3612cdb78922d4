// crates/shared-kernel/src/infrastructure/memory/memory_inbox_store.rs

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use async_trait::async_trait;
use chrono::Duration;
use crate::clock::{Clock, SystemClock};
use crate::domain::inbox::{InboxMessage, InboxStatus, UpdateInboxMessageParams};
use crate::domain::repositories::InboxStore;
use crate::domain::transaction::Transaction;
use crate::errors::{DomainError, Result};
use crate::infrastructure::memory::memory_transaction::memory_tx_id;
use crate::infrastructure::memory::RowLocks;

fn lock_key(id: &str) -> String {
    format!("inbox_messages:{}", id)
}

/// Variante en mémoire de la table `inbox_messages`.
pub struct InMemoryInboxStore {
    messages: Mutex<HashMap<String, InboxMessage>>,
    locks: Arc<RowLocks>,
    clock: Arc<dyn Clock>,
    /// Simulation d'erreur forcée
    pub error_to_return: Mutex<Option<DomainError>>,
}

impl InMemoryInboxStore {
    pub fn new(locks: Arc<RowLocks>) -> Self {
        Self {
            messages: Mutex::new(HashMap::new()),
            locks,
            clock: Arc::new(SystemClock),
            error_to_return: Mutex::new(None),
        }
    }

    /// Horloge utilisée pour le seuil de rétention.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    fn messages(&self) -> MutexGuard<'_, HashMap<String, InboxMessage>> {
        self.messages.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn check_error(&self) -> Result<()> {
        match self.error_to_return.lock().unwrap_or_else(|e| e.into_inner()).clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    pub fn fail_with(&self, error: Option<DomainError>) {
        *self.error_to_return.lock().unwrap_or_else(|e| e.into_inner()) = error;
    }

    /// Insère ou remplace directement (préparation des tests)
    pub fn insert(&self, message: InboxMessage) {
        self.messages().insert(message.id.clone(), message);
    }

    pub fn get(&self, id: &str) -> Option<InboxMessage> {
        self.messages().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.messages().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl InboxStore for InMemoryInboxStore {
    async fn save_inbox_message(
        &self,
        tx: Option<&mut dyn Transaction>,
        message: &InboxMessage,
    ) -> Result<bool> {
        self.check_error()?;
        memory_tx_id(tx)?;

        let mut messages = self.messages();
        if messages.contains_key(&message.id) {
            return Ok(false);
        }
        messages.insert(message.id.clone(), message.clone());
        Ok(true)
    }

    async fn get_pending_messages_for_processing(
        &self,
        tx: Option<&mut dyn Transaction>,
        max_attempts: i32,
        batch_size: i64,
    ) -> Result<Vec<InboxMessage>> {
        self.check_error()?;
        let tx_id = memory_tx_id(tx)?;

        let mut pending: Vec<InboxMessage> = self
            .messages()
            .values()
            .filter(|m| m.status.is_pending() && m.attempts < max_attempts)
            .cloned()
            .collect();
        pending.sort_by(|a, b| a.received_at.cmp(&b.received_at).then(a.id.cmp(&b.id)));

        let limit = batch_size.max(0) as usize;
        let mut selected = Vec::new();

        for message in pending {
            if selected.len() >= limit {
                break;
            }
            let key = lock_key(&message.id);
            let free = match tx_id {
                Some(id) => self.locks.try_lock(&key, id),
                None => !self.locks.is_locked_by_other(&key, None),
            };
            if free {
                selected.push(message);
            }
        }

        Ok(selected)
    }

    async fn update_inbox_message(
        &self,
        tx: Option<&mut dyn Transaction>,
        params: UpdateInboxMessageParams,
    ) -> Result<()> {
        self.check_error()?;
        memory_tx_id(tx)?;

        let mut messages = self.messages();
        let message = messages.get_mut(&params.id).ok_or_else(|| DomainError::NotFound {
            entity: "inbox_message",
            id: params.id.clone(),
        })?;
        params.apply(message);
        Ok(())
    }

    async fn delete_old_processed_messages(
        &self,
        tx: Option<&mut dyn Transaction>,
        retention: Duration,
        batch_size: i64,
    ) -> Result<u64> {
        self.check_error()?;
        let tx_id = memory_tx_id(tx)?;
        let cutoff = self.clock.now() - retention;

        let mut messages = self.messages();
        let mut expired: Vec<(chrono::DateTime<chrono::Utc>, String)> = messages
            .values()
            .filter(|m| m.status == InboxStatus::Processed)
            .filter_map(|m| m.processed_at.filter(|at| *at < cutoff).map(|at| (at, m.id.clone())))
            .filter(|(_, id)| !self.locks.is_locked_by_other(&lock_key(id), tx_id))
            .collect();
        expired.sort();
        expired.truncate(batch_size.max(0) as usize);

        for (_, id) in &expired {
            messages.remove(id);
        }
        Ok(expired.len() as u64)
    }
}
