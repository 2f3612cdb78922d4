// crates/shared-kernel/src/infrastructure/kafka/kafka_inbox_consumer.rs

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};
use rdkafka::client::ClientContext;
use rdkafka::config::ClientConfig;
use rdkafka::consumer::{CommitMode, Consumer, ConsumerContext, Rebalance, StreamConsumer};
use rdkafka::message::{BorrowedMessage, Headers, Message};
use rdkafka::{Offset, TopicPartitionList};
use tokio::sync::watch;
use crate::application::workers::configs::IngestionConfig;
use crate::application::workers::{CommitPlan, InboundMessage, InboxIngestor, PartitionBatcher};
use crate::errors::{AppError, AppResult, ErrorCode};

type SharedBatcher = Arc<Mutex<PartitionBatcher>>;

fn lock(batcher: &SharedBatcher) -> MutexGuard<'_, PartitionBatcher> {
    batcher.lock().unwrap_or_else(|e| e.into_inner())
}

/// Contexte rdkafka : sur révocation, les messages tamponnés des partitions
/// perdues sont abandonnés avant que le nouveau propriétaire ne prenne la main.
pub struct InboxConsumerContext {
    batcher: SharedBatcher,
}

impl InboxConsumerContext {
    fn new(batcher: SharedBatcher) -> Self {
        Self { batcher }
    }
}

impl ClientContext for InboxConsumerContext {}

impl ConsumerContext for InboxConsumerContext {
    fn pre_rebalance<'a>(&self, rebalance: &Rebalance<'a>) {
        match rebalance {
            Rebalance::Revoke(tpl) => {
                let mut batcher = lock(&self.batcher);
                for elem in tpl.elements() {
                    let dropped = batcher.revoke(elem.topic(), elem.partition());
                    tracing::info!(
                        topic = elem.topic(),
                        partition = elem.partition(),
                        dropped,
                        "Partition revoked"
                    );
                }
            }
            Rebalance::Assign(tpl) => {
                tracing::info!(partitions = tpl.count(), "Partitions assigned");
            }
            Rebalance::Error(e) => {
                tracing::error!(error = %e, "Rebalance error");
            }
        }
    }
}

/// Consumer Kafka -> inbox.
///
/// Commits manuels uniquement : un offset n'est acquitté qu'une fois le message
/// stocké (ou volontairement ignoré). Sur échec de stockage, la partition est
/// repositionnée sur le message fautif.
pub struct KafkaInboxConsumer {
    consumer: StreamConsumer<InboxConsumerContext>,
    batcher: SharedBatcher,
    ingestor: InboxIngestor,
    config: IngestionConfig,
}

impl KafkaInboxConsumer {
    pub fn new(brokers: &str, config: IngestionConfig, ingestor: InboxIngestor) -> AppResult<Self> {
        config.validate()?;

        let batcher = Arc::new(Mutex::new(PartitionBatcher::new(config.batch_size, config.flush_interval)));

        let consumer: StreamConsumer<InboxConsumerContext> = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("group.id", &config.group_id)
            .set("enable.auto.commit", "false")
            .set("auto.offset.reset", "earliest")
            .set("enable.partition.eof", "false")
            .set("session.timeout.ms", "45000")
            .set("max.poll.interval.ms", "300000")
            .create_with_context(InboxConsumerContext::new(batcher.clone()))
            .map_err(|e| AppError::new(ErrorCode::InternalError, format!("Kafka config error: {e}")))?;

        let topics: Vec<&str> = config.topics.iter().map(String::as_str).collect();
        consumer.subscribe(&topics)?;

        Ok(Self {
            consumer,
            batcher,
            ingestor,
            config,
        })
    }

    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) -> AppResult<()> {
        tracing::info!(
            topics = ?self.config.topics,
            group_id = %self.config.group_id,
            "Inbox consumer started"
        );

        let mut ticker = tokio::time::interval(
            (self.config.flush_interval / 4).max(Duration::from_millis(5)),
        );
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            if *shutdown.borrow() {
                break;
            }

            tokio::select! {
                _ = shutdown.changed() => break,
                _ = ticker.tick() => {
                    let expired = lock(&self.batcher).drain_expired(Instant::now());
                    for batch in expired {
                        self.flush(batch).await;
                    }
                }
                received = self.consumer.recv() => {
                    let inbound = match received {
                        Ok(message) => to_inbound(&message),
                        Err(e) => {
                            tracing::error!(error = %e, "Kafka receive error");
                            continue;
                        }
                    };
                    let full = lock(&self.batcher).push(inbound, Instant::now());
                    if let Some(batch) = full {
                        self.flush(batch).await;
                    }
                }
            }
        }

        // Les lots en cours sont écrits avant de rendre la main
        let remaining = lock(&self.batcher).drain_all();
        for batch in remaining {
            self.flush(batch).await;
        }

        tracing::info!("Inbox consumer stopped gracefully");
        Ok(())
    }

    async fn flush(&self, batch: Vec<InboundMessage>) {
        let (report, plan) = self.ingestor.ingest_batch(&batch).await;
        let Some(plan) = plan else {
            return;
        };

        tracing::debug!(
            topic = %plan.topic,
            partition = plan.partition,
            stored = report.stored,
            duplicates = report.duplicates,
            skipped = report.skipped,
            failed = report.failed,
            "Inbox batch flushed"
        );

        self.commit(&plan);

        if let Some(offset) = plan.rewind_to {
            let dropped = lock(&self.batcher).discard(&plan.topic, plan.partition, Instant::now());
            if let Err(e) = self.consumer.seek(
                &plan.topic,
                plan.partition,
                Offset::Offset(offset),
                Duration::from_secs(5),
            ) {
                tracing::error!(topic = %plan.topic, partition = plan.partition, offset, error = %e, "Seek failed");
            }
            tracing::warn!(
                topic = %plan.topic,
                partition = plan.partition,
                offset,
                dropped,
                "Partition rewound after storage failure"
            );
            tokio::time::sleep(self.config.failure_backoff).await;
        }
    }

    fn commit(&self, plan: &CommitPlan) {
        let Some(offset) = plan.commit_offset else {
            return;
        };

        // Kafka attend l'offset du prochain message à lire
        let mut tpl = TopicPartitionList::new();
        let committed = tpl
            .add_partition_offset(&plan.topic, plan.partition, Offset::Offset(offset + 1))
            .and_then(|_| self.consumer.commit(&tpl, CommitMode::Async));

        if let Err(e) = committed {
            tracing::error!(topic = %plan.topic, partition = plan.partition, offset, error = %e, "Offset commit failed");
        }
    }
}

fn to_inbound(message: &BorrowedMessage<'_>) -> InboundMessage {
    let headers = message
        .headers()
        .map(|headers| {
            headers
                .iter()
                .map(|h| (h.key.to_string(), h.value.map(<[u8]>::to_vec).unwrap_or_default()))
                .collect()
        })
        .unwrap_or_default();

    InboundMessage {
        topic: message.topic().to_string(),
        partition: message.partition(),
        offset: message.offset(),
        key: message.key().map(<[u8]>::to_vec),
        payload: message.payload().map(<[u8]>::to_vec).unwrap_or_default(),
        headers,
    }
}
