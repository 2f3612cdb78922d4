// crates/shared-kernel/src/application/ports/batch_publish_handler.rs

use async_trait::async_trait;
use uuid::Uuid;
use crate::domain::outbox::OutboxEvent;
use crate::errors::{AppError, AppResult, ErrorCode};

/// Résultat d'un envoi de lot : chaque événement est dans exactement un des deux ensembles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchPublishOutcome {
    pub succeeded: Vec<Uuid>,
    pub failed: Vec<Uuid>,
}

impl BatchPublishOutcome {
    pub fn all_succeeded(events: &[OutboxEvent]) -> Self {
        Self {
            succeeded: events.iter().map(|e| e.id).collect(),
            failed: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Issue de la livraison d'un événement au broker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryResult {
    Delivered,
    /// Refus propre à ce message (taille, topic inconnu...)
    Rejected(String),
    /// Broker injoignable
    BrokerUnavailable(String),
}

impl DeliveryResult {
    /// Répartit les livraisons en succès/échecs.
    ///
    /// Si tous les envois ont échoué faute de broker, le lot entier est en erreur :
    /// aucun id n'est fiable et rien ne doit être marqué.
    pub fn into_outcome(deliveries: Vec<(Uuid, DeliveryResult)>) -> AppResult<BatchPublishOutcome> {
        let unreachable = !deliveries.is_empty()
            && deliveries
                .iter()
                .all(|(_, d)| matches!(d, DeliveryResult::BrokerUnavailable(_)));

        if unreachable {
            let reason = deliveries
                .iter()
                .find_map(|(_, d)| match d {
                    DeliveryResult::BrokerUnavailable(r) => Some(r.clone()),
                    _ => None,
                })
                .unwrap_or_default();
            return Err(AppError::new(
                ErrorCode::ServiceUnavailable,
                format!("Broker unavailable: {}", reason),
            ));
        }

        let mut outcome = BatchPublishOutcome::default();
        for (id, delivery) in deliveries {
            match delivery {
                DeliveryResult::Delivered => outcome.succeeded.push(id),
                DeliveryResult::Rejected(reason) | DeliveryResult::BrokerUnavailable(reason) => {
                    tracing::warn!(event_id = %id, %reason, "Event delivery failed");
                    outcome.failed.push(id);
                }
            }
        }
        Ok(outcome)
    }
}

/// Remet un lot d'événements au broker.
///
/// `Err` signifie que la tentative entière est fatale (broker injoignable) :
/// le publisher ne marque alors aucun événement.
#[async_trait]
pub trait BatchPublishHandler: Send + Sync {
    async fn handle_batch(&self, events: &[OutboxEvent]) -> AppResult<BatchPublishOutcome>;
}
