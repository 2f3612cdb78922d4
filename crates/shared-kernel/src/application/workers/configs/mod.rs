mod inbox_processor_config;
mod inbox_retention_config;
mod ingestion_config;
mod outbox_publisher_config;

pub use inbox_processor_config::InboxProcessorConfig;
pub use inbox_retention_config::InboxRetentionConfig;
pub use ingestion_config::IngestionConfig;
pub use outbox_publisher_config::OutboxPublisherConfig;

use std::str::FromStr;

/// Lit une variable d'environnement ; absente ou illisible = `None`.
pub(crate) fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}
