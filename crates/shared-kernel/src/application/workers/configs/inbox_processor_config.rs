// crates/shared-kernel/src/application/workers/configs/inbox_processor_config.rs

use std::time::Duration;
use crate::application::workers::configs::env_parse;
use crate::errors::{DomainError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct InboxProcessorConfig {
    pub batch_size: i64,
    /// Un message avec `attempts >= max_attempts` n'est plus repris
    pub max_attempts: i32,
    pub poll_interval: Duration,
}

impl Default for InboxProcessorConfig {
    fn default() -> Self {
        Self {
            batch_size: 100,
            max_attempts: 5,
            poll_interval: Duration::from_secs(1),
        }
    }
}

impl InboxProcessorConfig {
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            batch_size: env_parse("INBOX_PROCESS_BATCH_SIZE").unwrap_or(default.batch_size),
            max_attempts: env_parse("INBOX_MAX_ATTEMPTS").unwrap_or(default.max_attempts),
            poll_interval: env_parse("INBOX_PROCESS_POLLING_MS")
                .map(Duration::from_millis)
                .unwrap_or(default.poll_interval),
        }
    }

    pub fn with_batch_size(mut self, batch_size: i64) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: i32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch_size <= 0 {
            return Err(DomainError::Validation {
                field: "batch_size",
                reason: "must be greater than zero".into(),
            });
        }
        if self.max_attempts <= 0 {
            return Err(DomainError::Validation {
                field: "max_attempts",
                reason: "must be greater than zero".into(),
            });
        }
        Ok(())
    }
}
