// crates/shared-kernel/src/infrastructure/memory/memory_transaction.rs

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use futures_util::future::BoxFuture;
use crate::domain::transaction::{IsolationLevel, Transaction, TransactionManager, TransactionWork};
use crate::errors::{DomainError, Result};
use crate::infrastructure::memory::RowLocks;

#[derive(Debug)]
pub struct InMemoryTransaction {
    id: u64,
    isolation: IsolationLevel,
}

impl InMemoryTransaction {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn isolation(&self) -> IsolationLevel {
        self.isolation
    }
}

impl Transaction for InMemoryTransaction {
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

/// Retrouve l'identifiant d'une transaction en mémoire (`None` hors transaction).
pub(crate) fn memory_tx_id(tx: Option<&mut dyn Transaction>) -> Result<Option<u64>> {
    match tx {
        None => Ok(None),
        Some(t) => t
            .as_any_mut()
            .downcast_mut::<InMemoryTransaction>()
            .map(|t| Some(t.id))
            .ok_or_else(|| DomainError::Internal("Type mismatch: Expected InMemoryTransaction".into())),
    }
}

/// Les écritures des stores en mémoire sont immédiates : seule la libération des
/// verrous est liée à la fin de la transaction.
pub struct InMemoryTransactionManager {
    locks: Arc<RowLocks>,
    next_id: AtomicU64,
}

impl InMemoryTransactionManager {
    pub fn new(locks: Arc<RowLocks>) -> Self {
        Self {
            locks,
            next_id: AtomicU64::new(1),
        }
    }

    pub fn locks(&self) -> Arc<RowLocks> {
        self.locks.clone()
    }
}

impl TransactionManager for InMemoryTransactionManager {
    fn in_transaction<'a>(
        &'a self,
        isolation: IsolationLevel,
        work: TransactionWork<'a>,
    ) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            let mut tx = InMemoryTransaction {
                id: self.next_id.fetch_add(1, Ordering::Relaxed),
                isolation,
            };

            let outcome = work(&mut tx).await;
            self.locks.release_all(tx.id);
            outcome
        })
    }
}
