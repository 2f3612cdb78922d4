// crates/shared-kernel/src/infrastructure/bootstrap/outbox.rs

use std::env;
use std::sync::Arc;
use crate::application::workers::configs::OutboxPublisherConfig;
use crate::application::workers::OutboxPublisher;
use crate::clock::SystemClock;
use crate::errors::AppResult;
use crate::infrastructure::bootstrap::{init_tracing, shutdown_channel};
use crate::infrastructure::kafka::{KafkaBatchPublisher, TopicRouter};
use crate::infrastructure::postgres::{PostgresContext, PostgresEventStore, PostgresTransactionManager};

/// Relais outbox d'un service : Postgres -> Kafka jusqu'à Ctrl+C.
pub async fn run_outbox_relay(service_name: &str, default_topic: &str) -> AppResult<()> {
    // 1. Logs
    init_tracing();
    tracing::info!("📡 Starting outbox relay for {}", service_name);

    // 2. Configuration via environnement
    let config = OutboxPublisherConfig::from_env();
    config.validate()?;

    let brokers = env::var("KAFKA_BROKERS").unwrap_or_else(|_| "localhost:9092".to_string());
    let topic = env::var("OUTBOX_TOPIC").unwrap_or_else(|_| default_topic.to_string());
    let router = match env::var("OUTBOX_TOPIC_ROUTES") {
        Ok(raw) => TopicRouter::new(topic).parse_routes(&raw)?,
        Err(_) => TopicRouter::new(topic),
    };

    // 3. Infrastructure
    let postgres = PostgresContext::builder()?.build().await?;
    let pool = postgres.pool();

    let publisher = OutboxPublisher::new(
        Arc::new(PostgresEventStore::new(pool.clone())),
        Arc::new(PostgresTransactionManager::new(pool)),
        Arc::new(KafkaBatchPublisher::new(&brokers, router)?),
        Arc::new(SystemClock),
        config.clone(),
    );

    tracing::info!(
        batch_size = config.batch_size,
        interval_ms = config.poll_interval.as_millis() as u64,
        max_retries = config.max_retries,
        "✅ Outbox publisher configured"
    );

    // 4. Exécution jusqu'au signal d'arrêt
    publisher.run(shutdown_channel()).await;

    tracing::info!("👋 Outbox relay for {} exited clean", service_name);
    Ok(())
}
