// crates/shared-kernel/src/infrastructure/kafka/kafka_batch_publisher.rs

use std::time::Duration;
use async_trait::async_trait;
use rdkafka::config::ClientConfig;
use rdkafka::error::{KafkaError, RDKafkaErrorCode};
use rdkafka::message::{Header, OwnedHeaders};
use rdkafka::producer::{FutureProducer, FutureRecord};
use crate::application::ports::{BatchPublishHandler, BatchPublishOutcome, DeliveryResult};
use crate::domain::outbox::OutboxEvent;
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::infrastructure::kafka::TopicRouter;

pub const EVENT_ID_HEADER: &str = "event_id";
pub const EVENT_TYPE_HEADER: &str = "event_type";

/// Publie les lots de l'outbox : clé = `aggregate_id` (ordre par agrégat),
/// corps = payload, headers `event_id` / `event_type`.
pub struct KafkaBatchPublisher {
    producer: FutureProducer,
    router: TopicRouter,
}

impl KafkaBatchPublisher {
    pub fn new(brokers: &str, router: TopicRouter) -> AppResult<Self> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("message.timeout.ms", "5000")
            .set("enable.idempotence", "true")
            .set("acks", "all")
            .set("compression.type", "snappy")
            .set("linger.ms", "10")
            .set("batch.num.messages", "1000")
            .create()
            .map_err(|e| AppError::new(ErrorCode::InternalError, format!("Kafka config error: {e}")))?;

        Ok(Self { producer, router })
    }
}

/// Broker injoignable vs refus propre au message.
pub(crate) fn classify(error: &KafkaError) -> DeliveryResult {
    let unreachable = matches!(
        error.rdkafka_error_code(),
        Some(
            RDKafkaErrorCode::MessageTimedOut
                | RDKafkaErrorCode::AllBrokersDown
                | RDKafkaErrorCode::BrokerTransportFailure
                | RDKafkaErrorCode::NetworkException
                | RDKafkaErrorCode::RequestTimedOut
        )
    );

    if unreachable {
        DeliveryResult::BrokerUnavailable(error.to_string())
    } else {
        DeliveryResult::Rejected(error.to_string())
    }
}

#[async_trait]
impl BatchPublishHandler for KafkaBatchPublisher {
    async fn handle_batch(&self, events: &[OutboxEvent]) -> AppResult<BatchPublishOutcome> {
        let mut pending = Vec::with_capacity(events.len());
        let mut deliveries = Vec::with_capacity(events.len());

        // 1. Mise en file locale de tout le lot (ordre conservé par partition)
        for event in events {
            let event_id = event.id.to_string();
            let record = FutureRecord::to(self.router.route(&event.aggregate_type))
                .payload(&event.payload)
                .key(&event.aggregate_id)
                .headers(
                    OwnedHeaders::new()
                        .insert(Header {
                            key: EVENT_ID_HEADER,
                            value: Some(&event_id),
                        })
                        .insert(Header {
                            key: EVENT_TYPE_HEADER,
                            value: Some(&event.event_type),
                        }),
                );

            match self.producer.send_result(record) {
                Ok(delivery) => pending.push((event.id, delivery)),
                Err((e, _)) => deliveries.push((event.id, classify(&e))),
            }
        }

        // 2. Attente des accusés
        for (id, delivery) in pending {
            let result = match tokio::time::timeout(Duration::from_secs(10), delivery).await {
                Ok(Ok(Ok(_))) => DeliveryResult::Delivered,
                Ok(Ok(Err((e, _)))) => classify(&e),
                Ok(Err(_canceled)) => DeliveryResult::BrokerUnavailable("producer dropped".into()),
                Err(_elapsed) => DeliveryResult::BrokerUnavailable("delivery timed out".into()),
            };
            deliveries.push((id, result));
        }

        let outcome = DeliveryResult::into_outcome(deliveries)?;
        tracing::debug!(
            succeeded = outcome.succeeded.len(),
            failed = outcome.failed.len(),
            "Kafka batch delivered"
        );
        Ok(outcome)
    }
}
