pub mod configs;

mod inbox_ingestor;
mod inbox_processor;
mod inbox_retention;
mod outbox_publisher;

#[cfg(test)]
mod inbox_processor_test;
#[cfg(test)]
mod inbox_retention_test;

pub use inbox_ingestor::{CommitPlan, InboundMessage, InboxIngestor, IngestOutcome, IngestReport, PartitionBatcher};
pub use inbox_processor::{InboxProcessor, ProcessReport};
pub use inbox_retention::InboxRetentionWorker;
pub use outbox_publisher::{OutboxPublisher, PublishReport};
