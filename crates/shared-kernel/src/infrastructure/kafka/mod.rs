// crates/shared-kernel/src/infrastructure/kafka/mod.rs

mod kafka_batch_publisher;
mod kafka_inbox_consumer;
mod topic_router;

pub use kafka_batch_publisher::{KafkaBatchPublisher, EVENT_ID_HEADER, EVENT_TYPE_HEADER};
pub use kafka_inbox_consumer::KafkaInboxConsumer;
pub use topic_router::TopicRouter;
