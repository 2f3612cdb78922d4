// crates/shared-kernel/src/infrastructure/kafka/topic_router.rs

use std::collections::HashMap;
use crate::errors::{DomainError, Result};

/// Choix du topic selon le type d'agrégat, avec un topic par défaut.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicRouter {
    default_topic: String,
    routes: HashMap<String, String>,
}

impl TopicRouter {
    pub fn new(default_topic: impl Into<String>) -> Self {
        Self {
            default_topic: default_topic.into(),
            routes: HashMap::new(),
        }
    }

    pub fn with_route(mut self, aggregate_type: impl Into<String>, topic: impl Into<String>) -> Self {
        self.routes.insert(aggregate_type.into(), topic.into());
        self
    }

    /// Format `aggregate_type:topic,aggregate_type:topic`.
    pub fn parse_routes(mut self, raw: &str) -> Result<Self> {
        for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (aggregate_type, topic) = entry
                .split_once(':')
                .map(|(a, t)| (a.trim(), t.trim()))
                .filter(|(a, t)| !a.is_empty() && !t.is_empty())
                .ok_or_else(|| DomainError::Validation {
                    field: "OUTBOX_TOPIC_ROUTES",
                    reason: format!("Invalid route '{}', expected aggregate_type:topic", entry),
                })?;
            self.routes.insert(aggregate_type.to_string(), topic.to_string());
        }
        Ok(self)
    }

    pub fn route(&self, aggregate_type: &str) -> &str {
        self.routes
            .get(aggregate_type)
            .map(String::as_str)
            .unwrap_or(&self.default_topic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_by_aggregate_with_fallback() {
        let router = TopicRouter::new("social.events")
            .parse_routes("chat:chat.events, friend_request : social.friend_requests")
            .unwrap();

        assert_eq!(router.route("chat"), "chat.events");
        assert_eq!(router.route("friend_request"), "social.friend_requests");
        assert_eq!(router.route("user"), "social.events");
    }

    #[test]
    fn rejects_malformed_routes() {
        let err = TopicRouter::new("social.events").parse_routes("chat").unwrap_err();
        assert!(matches!(err, DomainError::Validation { field: "OUTBOX_TOPIC_ROUTES", .. }));

        assert!(TopicRouter::new("social.events").parse_routes("chat:").is_err());
    }

    #[test]
    fn empty_route_list_keeps_default() {
        let router = TopicRouter::new("social.events").parse_routes("").unwrap();
        assert_eq!(router.route("anything"), "social.events");
    }
}
