// crates/shared-kernel/src/infrastructure/memory/row_locks.rs

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// Registre de verrous de lignes partagé entre les stores en mémoire et
/// `InMemoryTransactionManager` (équivalent de FOR UPDATE SKIP LOCKED).
///
/// Construit explicitement et passé aux composants : deux registres distincts
/// n'interfèrent jamais.
#[derive(Debug, Default)]
pub struct RowLocks {
    owners: Mutex<HashMap<String, u64>>,
}

impl RowLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn owners(&self) -> MutexGuard<'_, HashMap<String, u64>> {
        self.owners.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Prend le verrou pour `tx_id`. `false` si une autre transaction le détient.
    pub fn try_lock(&self, key: &str, tx_id: u64) -> bool {
        let mut owners = self.owners();
        match owners.get(key) {
            Some(owner) => *owner == tx_id,
            None => {
                owners.insert(key.to_string(), tx_id);
                true
            }
        }
    }

    /// Ligne verrouillée par une transaction autre que `tx_id`.
    pub fn is_locked_by_other(&self, key: &str, tx_id: Option<u64>) -> bool {
        self.owners()
            .get(key)
            .map_or(false, |owner| Some(*owner) != tx_id)
    }

    pub fn release_all(&self, tx_id: u64) -> usize {
        let mut owners = self.owners();
        let before = owners.len();
        owners.retain(|_, owner| *owner != tx_id);
        before - owners.len()
    }

    pub fn held_count(&self) -> usize {
        self.owners().len()
    }
}
