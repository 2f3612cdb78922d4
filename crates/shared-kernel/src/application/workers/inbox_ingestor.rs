// crates/shared-kernel/src/application/workers/inbox_ingestor.rs

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;
use crate::clock::Clock;
use crate::domain::inbox::InboxMessage;
use crate::domain::repositories::InboxStore;
use crate::errors::DomainError;

/// Message tel que reçu du broker, détaché du client Kafka.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundMessage {
    pub topic: String,
    pub partition: i32,
    pub offset: i64,
    pub key: Option<Vec<u8>>,
    pub payload: Vec<u8>,
    pub headers: Vec<(String, Vec<u8>)>,
}

impl InboundMessage {
    pub fn header(&self, name: &str) -> Option<&[u8]> {
        self.headers
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_slice())
    }
}

type PartitionKey = (String, i32);

struct PartitionBuffer {
    messages: Vec<InboundMessage>,
    last_flush: Instant,
}

/// Accumule les messages par partition, dans l'ordre d'arrivée.
///
/// Un lot part dès que sa taille atteint `max_size`, ou quand `flush_interval`
/// s'est écoulé depuis le dernier flush de la partition.
pub struct PartitionBatcher {
    max_size: usize,
    flush_interval: Duration,
    partitions: HashMap<PartitionKey, PartitionBuffer>,
}

impl PartitionBatcher {
    pub fn new(max_size: usize, flush_interval: Duration) -> Self {
        Self {
            max_size: max_size.max(1),
            flush_interval,
            partitions: HashMap::new(),
        }
    }

    /// Ajoute un message ; retourne le lot si la taille max est atteinte.
    pub fn push(&mut self, message: InboundMessage, now: Instant) -> Option<Vec<InboundMessage>> {
        let buffer = self
            .partitions
            .entry((message.topic.clone(), message.partition))
            .or_insert_with(|| PartitionBuffer {
                messages: Vec::new(),
                last_flush: now,
            });

        buffer.messages.push(message);

        if buffer.messages.len() >= self.max_size {
            buffer.last_flush = now;
            return Some(std::mem::take(&mut buffer.messages));
        }
        None
    }

    /// Lots des partitions dont l'intervalle est écoulé.
    pub fn drain_expired(&mut self, now: Instant) -> Vec<Vec<InboundMessage>> {
        let interval = self.flush_interval;
        let mut batches = Vec::new();

        for buffer in self.partitions.values_mut() {
            if now.saturating_duration_since(buffer.last_flush) < interval {
                continue;
            }
            buffer.last_flush = now;
            if !buffer.messages.is_empty() {
                batches.push(std::mem::take(&mut buffer.messages));
            }
        }

        batches
    }

    /// Tout ce qui reste (arrêt du consumer).
    pub fn drain_all(&mut self) -> Vec<Vec<InboundMessage>> {
        self.partitions
            .drain()
            .map(|(_, buffer)| buffer.messages)
            .filter(|messages| !messages.is_empty())
            .collect()
    }

    /// Oublie le tampon d'une partition rembobinée : ces messages seront relus.
    pub fn discard(&mut self, topic: &str, partition: i32, now: Instant) -> usize {
        match self.partitions.get_mut(&(topic.to_string(), partition)) {
            Some(buffer) => {
                buffer.last_flush = now;
                std::mem::take(&mut buffer.messages).len()
            }
            None => 0,
        }
    }

    /// Partition retirée à cette instance (rebalance) : tampon et état abandonnés.
    /// Rien n'a été commité pour ces messages, le nouveau propriétaire les relira.
    pub fn revoke(&mut self, topic: &str, partition: i32) -> usize {
        self.partitions
            .remove(&(topic.to_string(), partition))
            .map_or(0, |buffer| buffer.messages.len())
    }

    pub fn buffered(&self) -> usize {
        self.partitions.values().map(|b| b.messages.len()).sum()
    }
}

/// Sort d'un message après ingestion.
#[derive(Debug, Clone, PartialEq)]
pub enum IngestOutcome {
    Stored,
    /// Déjà présent (redelivery)
    Duplicate,
    /// Non identifiable : acquitté sans être stocké
    Skipped(String),
    /// Stockage en échec : ne doit pas être acquitté
    Failed(DomainError),
}

impl IngestOutcome {
    pub fn is_safe_to_commit(&self) -> bool {
        !matches!(self, IngestOutcome::Failed(_))
    }
}

/// Acquittement à effectuer pour un lot d'une partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitPlan {
    pub topic: String,
    pub partition: i32,
    /// Offset du dernier message du préfixe sûr (Kafka attend `offset + 1`)
    pub commit_offset: Option<i64>,
    /// Premier offset en échec : la partition doit y être repositionnée
    pub rewind_to: Option<i64>,
}

impl CommitPlan {
    /// Les offsets sont acquittés dans l'ordre : rien au-delà du premier échec.
    pub fn from_outcomes(batch: &[InboundMessage], outcomes: &[IngestOutcome]) -> Option<Self> {
        let first = batch.first()?;
        let mut plan = CommitPlan {
            topic: first.topic.clone(),
            partition: first.partition,
            commit_offset: None,
            rewind_to: None,
        };

        for (message, outcome) in batch.iter().zip(outcomes) {
            if outcome.is_safe_to_commit() {
                plan.commit_offset = Some(message.offset);
            } else {
                plan.rewind_to = Some(message.offset);
                break;
            }
        }

        Some(plan)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestReport {
    pub stored: usize,
    pub duplicates: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Écrit les lots reçus dans l'inbox.
pub struct InboxIngestor {
    store: Arc<dyn InboxStore>,
    clock: Arc<dyn Clock>,
    id_header: String,
}

impl InboxIngestor {
    pub fn new(store: Arc<dyn InboxStore>, clock: Arc<dyn Clock>, id_header: impl Into<String>) -> Self {
        Self {
            store,
            clock,
            id_header: id_header.into(),
        }
    }

    /// Clé d'idempotence : UUID porté par le header configuré.
    pub fn extract_id(&self, message: &InboundMessage) -> Result<Uuid, String> {
        let raw = message
            .header(&self.id_header)
            .ok_or_else(|| format!("missing '{}' header", self.id_header))?;
        let text = std::str::from_utf8(raw)
            .map_err(|_| format!("'{}' header is not valid UTF-8", self.id_header))?;
        Uuid::parse_str(text.trim())
            .map_err(|e| format!("'{}' header is not a UUID: {}", self.id_header, e))
    }

    pub async fn ingest(&self, message: &InboundMessage) -> IngestOutcome {
        let id = match self.extract_id(message) {
            Ok(id) => id,
            Err(reason) => {
                // Pas de déduplication possible : on accepte de perdre le message
                tracing::warn!(
                    topic = %message.topic,
                    partition = message.partition,
                    offset = message.offset,
                    %reason,
                    "Skipping unidentifiable message"
                );
                return IngestOutcome::Skipped(reason);
            }
        };

        let inbox_message = InboxMessage::received(
            id.to_string(),
            message.topic.clone(),
            message.partition,
            message.offset,
            message.payload.clone(),
            self.clock.now(),
        );

        match self.store.save_inbox_message(None, &inbox_message).await {
            Ok(true) => IngestOutcome::Stored,
            Ok(false) => {
                tracing::debug!(event_id = %id, offset = message.offset, "Duplicate inbox message ignored");
                IngestOutcome::Duplicate
            }
            Err(e) => {
                tracing::error!(
                    event_id = %id,
                    topic = %message.topic,
                    partition = message.partition,
                    offset = message.offset,
                    error = %e,
                    "Failed to store inbox message"
                );
                IngestOutcome::Failed(e)
            }
        }
    }

    /// Traite un lot d'une partition, message par message, dans l'ordre.
    pub async fn ingest_batch(&self, batch: &[InboundMessage]) -> (IngestReport, Option<CommitPlan>) {
        let mut outcomes = Vec::with_capacity(batch.len());
        let mut report = IngestReport::default();

        for message in batch {
            let outcome = self.ingest(message).await;
            match &outcome {
                IngestOutcome::Stored => report.stored += 1,
                IngestOutcome::Duplicate => report.duplicates += 1,
                IngestOutcome::Skipped(_) => report.skipped += 1,
                IngestOutcome::Failed(_) => report.failed += 1,
            }
            outcomes.push(outcome);
        }

        (report, CommitPlan::from_outcomes(batch, &outcomes))
    }
}
