// crates/shared-kernel/src/domain/outbox/outbox_event.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::domain::events::DomainEvent;
use crate::errors::{DomainError, Result};

/// Ligne de la table `outbox_events`.
///
/// Écrite par le code métier dans la même transaction que la modification qu'elle
/// décrit, puis mutée uniquement par le publisher : `published_at` passe de `None`
/// à `Some` une seule fois, `retry_count` ne fait qu'augmenter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboxEvent {
    pub id: Uuid,
    pub aggregate_type: String,
    pub aggregate_id: String,
    pub event_type: String,
    pub payload: Vec<u8>,
    pub created_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
    pub retry_count: i32,
    pub next_attempt_at: Option<DateTime<Utc>>,
}

impl OutboxEvent {
    pub fn new(
        aggregate_type: impl Into<String>,
        aggregate_id: impl Into<String>,
        event_type: impl Into<String>,
        payload: Vec<u8>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            aggregate_type: aggregate_type.into(),
            aggregate_id: aggregate_id.into(),
            event_type: event_type.into(),
            payload,
            created_at: Utc::now(),
            published_at: None,
            retry_count: 0,
            next_attempt_at: None,
        }
    }

    /// Construit la ligne outbox à partir d'un événement métier (payload JSON).
    pub fn wrap(event: &dyn DomainEvent) -> Result<Self> {
        let payload = serde_json::to_vec(&event.payload()).map_err(|e| DomainError::Validation {
            field: "payload",
            reason: e.to_string(),
        })?;

        Ok(Self {
            id: event.event_id(),
            aggregate_type: event.aggregate_type().into_owned(),
            aggregate_id: event.aggregate_id(),
            event_type: event.event_type().into_owned(),
            payload,
            created_at: event.occurred_at(),
            published_at: None,
            retry_count: 0,
            next_attempt_at: None,
        })
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn is_published(&self) -> bool {
        self.published_at.is_some()
    }

    /// Éligible à une (re)tentative à l'instant `now`.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_attempt_at.map_or(true, |at| at <= now)
    }
}
