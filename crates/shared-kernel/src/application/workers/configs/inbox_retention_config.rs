// crates/shared-kernel/src/application/workers/configs/inbox_retention_config.rs

use std::time::Duration;
use crate::application::workers::configs::env_parse;
use crate::errors::{DomainError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct InboxRetentionConfig {
    pub interval: Duration,
    /// Âge minimal (sur `processed_at`) avant suppression
    pub retention_period: Duration,
    pub batch_size: i64,
    pub pause_between_batches: Duration,
}

impl Default for InboxRetentionConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(3600),
            retention_period: Duration::from_secs(7 * 24 * 3600),
            batch_size: 1000,
            pause_between_batches: Duration::from_millis(100),
        }
    }
}

impl InboxRetentionConfig {
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            interval: env_parse("INBOX_RETENTION_INTERVAL_SECS")
                .map(Duration::from_secs)
                .unwrap_or(default.interval),
            retention_period: env_parse::<u64>("INBOX_RETENTION_HOURS")
                .map(|h| Duration::from_secs(h * 3600))
                .unwrap_or(default.retention_period),
            batch_size: env_parse("INBOX_RETENTION_BATCH_SIZE").unwrap_or(default.batch_size),
            ..default
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_retention_period(mut self, period: Duration) -> Self {
        self.retention_period = period;
        self
    }

    pub fn with_batch_size(mut self, batch_size: i64) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_pause_between_batches(mut self, pause: Duration) -> Self {
        self.pause_between_batches = pause;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch_size <= 0 {
            return Err(DomainError::Validation {
                field: "batch_size",
                reason: "must be greater than zero".into(),
            });
        }
        if self.interval.is_zero() {
            return Err(DomainError::Validation {
                field: "interval",
                reason: "must not be zero".into(),
            });
        }
        Ok(())
    }
}
