// crates/shared-kernel/src/infrastructure/memory/memory_event_store.rs

use std::sync::{Arc, Mutex, MutexGuard};
use async_trait::async_trait;
use crate::domain::outbox::{OutboxEvent, SearchEventsOptions, UpdateEventsOptions};
use crate::domain::repositories::EventStore;
use crate::domain::transaction::Transaction;
use crate::errors::{DomainError, Result};
use crate::infrastructure::memory::memory_transaction::memory_tx_id;
use crate::infrastructure::memory::RowLocks;

fn lock_key(event: &OutboxEvent) -> String {
    format!("outbox_events:{}", event.id)
}

/// Variante en mémoire de la table `outbox_events`.
pub struct InMemoryEventStore {
    events: Mutex<Vec<OutboxEvent>>,
    locks: Arc<RowLocks>,
    /// Simulation d'erreur forcée
    pub error_to_return: Mutex<Option<DomainError>>,
}

impl InMemoryEventStore {
    pub fn new(locks: Arc<RowLocks>) -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            locks,
            error_to_return: Mutex::new(None),
        }
    }

    fn events(&self) -> MutexGuard<'_, Vec<OutboxEvent>> {
        self.events.lock().unwrap_or_else(|e| e.into_inner())
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

    /// Insère directement, hors transaction (préparation des tests)
    pub fn insert(&self, event: OutboxEvent) {
        self.events().push(event);
    }

    pub fn get(&self, id: uuid::Uuid) -> Option<OutboxEvent> {
        self.events().iter().find(|e| e.id == id).cloned()
    }

    pub fn all(&self) -> Vec<OutboxEvent> {
        self.events().clone()
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn save_event(&self, tx: &mut dyn Transaction, event: &OutboxEvent) -> Result<()> {
        self.check_error()?;
        memory_tx_id(Some(tx))?;

        let mut events = self.events();
        if events.iter().any(|e| e.id == event.id) {
            return Err(DomainError::AlreadyExists {
                entity: "outbox_event",
                field: "id",
                value: event.id.to_string(),
            });
        }
        events.push(event.clone());
        Ok(())
    }

    async fn search_events(
        &self,
        tx: Option<&mut dyn Transaction>,
        options: SearchEventsOptions,
    ) -> Vec<OutboxEvent> {
        let tx_id = match self.check_error().and_then(|_| memory_tx_id(tx)) {
            Ok(id) => id,
            Err(e) => {
                tracing::error!(error = %e, "Outbox search failed, returning no events");
                return Vec::new();
            }
        };

        let mut matched: Vec<OutboxEvent> = self
            .events()
            .iter()
            .filter(|e| options.matches(e))
            .cloned()
            .collect();
        matched.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        let limit = options.limit.map_or(usize::MAX, |l| l.max(0) as usize);
        let mut selected = Vec::new();

        for event in matched {
            if selected.len() >= limit {
                break;
            }
            let key = lock_key(&event);
            if options.lock {
                // Hors transaction, le verrou n'existe que le temps de la requête
                let free = match tx_id {
                    Some(id) => self.locks.try_lock(&key, id),
                    None => !self.locks.is_locked_by_other(&key, None),
                };
                if !free {
                    continue;
                }
            }
            selected.push(event);
        }

        selected
    }

    async fn update_events(
        &self,
        tx: Option<&mut dyn Transaction>,
        options: UpdateEventsOptions,
    ) -> Result<u64> {
        self.check_error()?;
        memory_tx_id(tx)?;

        if !options.has_mutation() || options.targets_nothing() {
            return Ok(0);
        }

        let mut touched = 0;
        for event in self.events().iter_mut().filter(|e| options.matches(e)) {
            options.apply(event);
            touched += 1;
        }
        Ok(touched)
    }
}
