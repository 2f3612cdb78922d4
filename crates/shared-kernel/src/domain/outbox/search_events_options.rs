// crates/shared-kernel/src/domain/outbox/search_events_options.rs

use chrono::{DateTime, Utc};
use crate::domain::outbox::OutboxEvent;

/// Filtres de `EventStore::search_events`. Les résultats sont toujours triés par
/// `created_at` croissant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchEventsOptions {
    /// Borne basse (incluse) sur `created_at`, pour le partition pruning
    pub not_before: Option<DateTime<Utc>>,
    /// Borne haute (incluse) sur `created_at`
    pub not_after: Option<DateTime<Utc>>,
    pub aggregate_type: Option<String>,
    pub event_type: Option<String>,
    /// `published_at IS NULL`
    pub only_unpublished: bool,
    /// `retry_count <= N`
    pub max_retry_count: Option<i32>,
    /// `next_attempt_at IS NULL OR next_attempt_at <= due_at`
    pub due_at: Option<DateTime<Utc>>,
    pub limit: Option<i64>,
    /// Verrouille les lignes retournées jusqu'à la fin de la transaction
    /// et ignore celles déjà verrouillées ailleurs (FOR UPDATE SKIP LOCKED).
    pub lock: bool,
}

impl SearchEventsOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_window(mut self, not_before: DateTime<Utc>, not_after: DateTime<Utc>) -> Self {
        self.not_before = Some(not_before);
        self.not_after = Some(not_after);
        self
    }

    pub fn with_aggregate_type(mut self, aggregate_type: impl Into<String>) -> Self {
        self.aggregate_type = Some(aggregate_type.into());
        self
    }

    pub fn with_event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = Some(event_type.into());
        self
    }

    pub fn only_unpublished(mut self) -> Self {
        self.only_unpublished = true;
        self
    }

    pub fn with_max_retry_count(mut self, max: i32) -> Self {
        self.max_retry_count = Some(max);
        self
    }

    pub fn due_at(mut self, at: DateTime<Utc>) -> Self {
        self.due_at = Some(at);
        self
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn locked(mut self) -> Self {
        self.lock = true;
        self
    }

    /// Prédicat équivalent à la clause WHERE (hors verrouillage et limite).
    pub fn matches(&self, event: &OutboxEvent) -> bool {
        self.not_before.map_or(true, |t| event.created_at >= t)
            && self.not_after.map_or(true, |t| event.created_at <= t)
            && self.aggregate_type.as_ref().map_or(true, |t| &event.aggregate_type == t)
            && self.event_type.as_ref().map_or(true, |t| &event.event_type == t)
            && (!self.only_unpublished || !event.is_published())
            && self.max_retry_count.map_or(true, |max| event.retry_count <= max)
            && self.due_at.map_or(true, |at| event.is_due(at))
    }
}
