// crates/shared-kernel/src/domain/repositories/event_store.rs

use async_trait::async_trait;
use crate::domain::outbox::{OutboxEvent, SearchEventsOptions, UpdateEventsOptions};
use crate::domain::transaction::Transaction;
use crate::errors::Result;

/// Accès à la table `outbox_events`.
///
/// Chaque opération prend une transaction optionnelle : avec `Some`, l'opération
/// s'exécute dans la transaction de l'appelant, sinon sur le pool.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Insère l'événement dans la transaction métier en cours.
    async fn save_event(&self, tx: &mut dyn Transaction, event: &OutboxEvent) -> Result<()>;

    /// Recherche filtrée, triée par `created_at` croissant.
    /// Une erreur de stockage est journalisée et donne un résultat vide.
    async fn search_events(
        &self,
        tx: Option<&mut dyn Transaction>,
        options: SearchEventsOptions,
    ) -> Vec<OutboxEvent>;

    /// Applique les mutations demandées et retourne le nombre de lignes touchées.
    /// Sans mutation demandée, ne fait rien et retourne 0.
    async fn update_events(
        &self,
        tx: Option<&mut dyn Transaction>,
        options: UpdateEventsOptions,
    ) -> Result<u64>;
}
