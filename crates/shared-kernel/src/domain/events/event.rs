// crates/shared-kernel/src/domain/events/event.rs

use std::borrow::Cow;
use std::fmt::Debug;
use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

pub trait DomainEvent: Debug + Send + Sync {
    /// Identifiant unique de l'événement (pour l'idempotence côté consommateur)
    fn event_id(&self) -> Uuid {
        Uuid::now_v7()
    }

    /// Nom de l'événement (ex: "friend_request.created")
    fn event_type(&self) -> Cow<'_, str>;

    /// Nom de l'agrégat (ex: "friend_request")
    fn aggregate_type(&self) -> Cow<'_, str>;

    /// ID de l'agrégat (ex: "123e4567-e89b...")
    fn aggregate_id(&self) -> String;

    /// Horodatage (quand c'est arrivé)
    fn occurred_at(&self) -> DateTime<Utc>;

    /// Les données réelles en JSON
    fn payload(&self) -> Value;
}
