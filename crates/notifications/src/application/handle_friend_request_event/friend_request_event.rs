// crates/notifications/src/application/handle_friend_request_event/friend_request_event.rs

use serde::Deserialize;

/// Enveloppe publiée par le service social : `{"type": ..., "data": {...}}`.
#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    event_type: String,
    #[serde(default)]
    data: serde_json::Value,
}

/// Contrat local : on ne décrit que ce qui nous intéresse.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FriendRequestCreated {
    pub request_id: String,
    pub sender_id: String,
    pub receiver_id: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FriendRequestUpdated {
    pub request_id: String,
    pub sender_id: String,
    pub receiver_id: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FriendRequestEvent {
    Created(FriendRequestCreated),
    Updated(FriendRequestUpdated),
    /// Type inconnu de ce service
    Ignored(String),
}

impl FriendRequestEvent {
    /// JSON invalide, ou type connu avec des données incomplètes : erreur.
    pub fn parse(payload: &[u8]) -> Result<Self, serde_json::Error> {
        let envelope: Envelope = serde_json::from_slice(payload)?;

        match envelope.event_type.as_str() {
            "friend_request.created" => serde_json::from_value(envelope.data).map(Self::Created),
            "friend_request.updated" => serde_json::from_value(envelope.data).map(Self::Updated),
            _ => Ok(Self::Ignored(envelope.event_type)),
        }
    }
}
