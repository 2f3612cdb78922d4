// crates/shared-kernel/src/application/workers/configs/ingestion_config.rs

use std::time::Duration;
use crate::application::workers::configs::env_parse;
use crate::errors::{DomainError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct IngestionConfig {
    pub topics: Vec<String>,
    pub group_id: String,
    /// Taille max d'un lot par partition
    pub batch_size: usize,
    /// Délai max depuis le dernier flush d'une partition
    pub flush_interval: Duration,
    /// Header portant la clé d'idempotence
    pub id_header: String,
    /// Pause après un échec de stockage, avant de relire la partition
    pub failure_backoff: Duration,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            topics: vec!["social.events".to_string()],
            group_id: "notifications-inbox".to_string(),
            batch_size: 100,
            flush_interval: Duration::from_secs(1),
            id_header: "event_id".to_string(),
            failure_backoff: Duration::from_secs(1),
        }
    }
}

impl IngestionConfig {
    pub fn from_env() -> Self {
        let default = Self::default();

        let topics = std::env::var("INBOX_TOPICS")
            .ok()
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(String::from)
                    .collect::<Vec<_>>()
            })
            .filter(|topics| !topics.is_empty())
            .unwrap_or(default.topics);

        Self {
            topics,
            group_id: std::env::var("INBOX_GROUP_ID").unwrap_or(default.group_id),
            batch_size: env_parse("INBOX_BATCH_SIZE").unwrap_or(default.batch_size),
            flush_interval: env_parse("INBOX_FLUSH_MS")
                .map(Duration::from_millis)
                .unwrap_or(default.flush_interval),
            ..default
        }
    }

    pub fn with_topics<I, S>(mut self, topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.topics = topics.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_group_id(mut self, group_id: impl Into<String>) -> Self {
        self.group_id = group_id.into();
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_flush_interval(mut self, interval: Duration) -> Self {
        self.flush_interval = interval;
        self
    }

    pub fn with_id_header(mut self, header: impl Into<String>) -> Self {
        self.id_header = header.into();
        self
    }

    pub fn with_failure_backoff(mut self, backoff: Duration) -> Self {
        self.failure_backoff = backoff;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.topics.is_empty() {
            return Err(DomainError::Validation {
                field: "topics",
                reason: "at least one topic is required".into(),
            });
        }
        if self.group_id.trim().is_empty() {
            return Err(DomainError::Validation {
                field: "group_id",
                reason: "must not be blank".into(),
            });
        }
        if self.batch_size == 0 {
            return Err(DomainError::Validation {
                field: "batch_size",
                reason: "must be greater than zero".into(),
            });
        }
        if self.flush_interval.is_zero() {
            return Err(DomainError::Validation {
                field: "flush_interval",
                reason: "must not be zero".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_listen_to_social_events() {
        let config = IngestionConfig::default();

        assert!(config.validate().is_ok());
        assert_eq!(config.topics, vec!["social.events"]);
        assert_eq!(config.id_header, "event_id");
    }

    #[test]
    fn requires_a_topic() {
        let err = IngestionConfig::default()
            .with_topics(Vec::<String>::new())
            .validate()
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation { field: "topics", .. }));
    }
}
