// crates/shared-kernel/src/domain/outbox/update_events_options.rs

use chrono::{DateTime, Utc};
use uuid::Uuid;
use crate::domain::outbox::OutboxEvent;

/// Mise à jour groupée de `outbox_events`.
///
/// Les filtres reprennent ceux de la sélection (type d'agrégat, fenêtre, non publiés)
/// pour qu'un UPDATE ne touche jamais une ligne hors du lot sélectionné.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateEventsOptions {
    /// `None` = pas de filtre sur l'id, `Some(vec![])` = ne touche aucune ligne
    pub ids: Option<Vec<Uuid>>,
    pub aggregate_type: Option<String>,
    pub not_before: Option<DateTime<Utc>>,
    pub not_after: Option<DateTime<Utc>>,
    pub only_unpublished: bool,

    pub set_published_at: Option<DateTime<Utc>>,
    pub inc_retry_by: Option<i32>,
    pub set_next_attempt_at: Option<DateTime<Utc>>,
}

impl UpdateEventsOptions {
    pub fn for_ids(ids: Vec<Uuid>) -> Self {
        Self {
            ids: Some(ids),
            ..Self::default()
        }
    }

    pub fn with_aggregate_type(mut self, aggregate_type: Option<String>) -> Self {
        self.aggregate_type = aggregate_type;
        self
    }

    pub fn with_window(mut self, not_before: DateTime<Utc>, not_after: DateTime<Utc>) -> Self {
        self.not_before = Some(not_before);
        self.not_after = Some(not_after);
        self
    }

    pub fn only_unpublished(mut self) -> Self {
        self.only_unpublished = true;
        self
    }

    pub fn set_published_at(mut self, at: DateTime<Utc>) -> Self {
        self.set_published_at = Some(at);
        self
    }

    pub fn inc_retry_by(mut self, by: i32) -> Self {
        self.inc_retry_by = Some(by);
        self
    }

    pub fn set_next_attempt_at(mut self, at: DateTime<Utc>) -> Self {
        self.set_next_attempt_at = Some(at);
        self
    }

    /// Aucune mutation demandée : l'appel est un no-op.
    pub fn has_mutation(&self) -> bool {
        self.set_published_at.is_some()
            || self.inc_retry_by.is_some()
            || self.set_next_attempt_at.is_some()
    }

    /// Liste d'ids explicitement vide : aucune ligne ne peut correspondre.
    pub fn targets_nothing(&self) -> bool {
        matches!(&self.ids, Some(ids) if ids.is_empty())
    }

    pub fn matches(&self, event: &OutboxEvent) -> bool {
        self.ids.as_ref().map_or(true, |ids| ids.contains(&event.id))
            && self.aggregate_type.as_ref().map_or(true, |t| &event.aggregate_type == t)
            && self.not_before.map_or(true, |t| event.created_at >= t)
            && self.not_after.map_or(true, |t| event.created_at <= t)
            && (!self.only_unpublished || !event.is_published())
    }

    pub fn apply(&self, event: &mut OutboxEvent) {
        if let Some(at) = self.set_published_at {
            event.published_at = Some(at);
        }
        if let Some(by) = self.inc_retry_by {
            event.retry_count += by;
        }
        if let Some(at) = self.set_next_attempt_at {
            event.next_attempt_at = Some(at);
        }
    }
}
