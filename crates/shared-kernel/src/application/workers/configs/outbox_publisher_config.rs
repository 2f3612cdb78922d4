// crates/shared-kernel/src/application/workers/configs/outbox_publisher_config.rs

use std::time::Duration;
use crate::application::workers::configs::env_parse;
use crate::errors::{DomainError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct OutboxPublisherConfig {
    /// `None` = tous les agrégats
    pub aggregate_type: Option<String>,
    pub batch_size: i64,
    pub poll_interval: Duration,
    /// Profondeur de scan sur `created_at`
    pub window: Duration,
    /// Au-delà, l'événement n'est plus sélectionné (intervention manuelle)
    pub max_retries: i32,
    pub retry_interval: Duration,
}

impl Default for OutboxPublisherConfig {
    fn default() -> Self {
        Self {
            aggregate_type: None,
            batch_size: 100,
            poll_interval: Duration::from_millis(500),
            window: Duration::from_secs(24 * 3600),
            max_retries: 5,
            retry_interval: Duration::from_secs(30),
        }
    }
}

impl OutboxPublisherConfig {
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            aggregate_type: std::env::var("OUTBOX_AGGREGATE_TYPE")
                .ok()
                .filter(|v| !v.trim().is_empty()),
            batch_size: env_parse("OUTBOX_BATCH_SIZE").unwrap_or(default.batch_size),
            poll_interval: env_parse("OUTBOX_POLLING_MS")
                .map(Duration::from_millis)
                .unwrap_or(default.poll_interval),
            window: env_parse("OUTBOX_WINDOW_SECS")
                .map(Duration::from_secs)
                .unwrap_or(default.window),
            max_retries: env_parse("OUTBOX_MAX_RETRIES").unwrap_or(default.max_retries),
            retry_interval: env_parse("OUTBOX_RETRY_INTERVAL_SECS")
                .map(Duration::from_secs)
                .unwrap_or(default.retry_interval),
        }
    }

    pub fn with_aggregate_type(mut self, aggregate_type: impl Into<String>) -> Self {
        self.aggregate_type = Some(aggregate_type.into());
        self
    }

    pub fn with_batch_size(mut self, batch_size: i64) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    pub fn with_max_retries(mut self, max_retries: i32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_retry_interval(mut self, interval: Duration) -> Self {
        self.retry_interval = interval;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch_size <= 0 {
            return Err(DomainError::Validation {
                field: "batch_size",
                reason: "must be greater than zero".into(),
            });
        }
        if self.max_retries < 0 {
            return Err(DomainError::Validation {
                field: "max_retries",
                reason: "must not be negative".into(),
            });
        }
        if self.window.is_zero() {
            return Err(DomainError::Validation {
                field: "window",
                reason: "must not be empty".into(),
            });
        }
        if self.poll_interval.is_zero() {
            return Err(DomainError::Validation {
                field: "poll_interval",
                reason: "must not be zero".into(),
            });
        }
        Ok(())
    }
}
