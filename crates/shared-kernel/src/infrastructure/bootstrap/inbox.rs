// crates/shared-kernel/src/infrastructure/bootstrap/inbox.rs

use std::env;
use std::future::Future;
use std::sync::Arc;
use sqlx::PgPool;
use crate::application::ports::InboxMessageHandler;
use crate::application::workers::configs::{IngestionConfig, InboxProcessorConfig, InboxRetentionConfig};
use crate::application::workers::{InboxIngestor, InboxProcessor, InboxRetentionWorker};
use crate::clock::SystemClock;
use crate::errors::AppResult;
use crate::infrastructure::bootstrap::{init_tracing, shutdown_channel};
use crate::infrastructure::kafka::KafkaInboxConsumer;
use crate::infrastructure::postgres::utils::run_kernel_postgres_migrations;
use crate::infrastructure::postgres::{PostgresContext, PostgresInboxStore, PostgresTransactionManager};

/// Consumer Kafka -> `inbox_messages` jusqu'à Ctrl+C.
pub async fn run_inbox_consumer(service_name: &str) -> AppResult<()> {
    init_tracing();
    tracing::info!("📥 Starting inbox consumer for {}", service_name);

    let config = IngestionConfig::from_env();
    let brokers = env::var("KAFKA_BROKERS").unwrap_or_else(|_| "localhost:9092".to_string());

    let postgres = PostgresContext::builder()?.build().await?;
    let pool = postgres.pool();
    run_kernel_postgres_migrations(&pool).await?;

    let ingestor = InboxIngestor::new(
        Arc::new(PostgresInboxStore::new(pool)),
        Arc::new(SystemClock),
        config.id_header.clone(),
    );
    let consumer = KafkaInboxConsumer::new(&brokers, config, ingestor)?;

    consumer.run(shutdown_channel()).await?;

    tracing::info!("👋 Inbox consumer for {} exited clean", service_name);
    Ok(())
}

/// Processeur + rétention de l'inbox, côte à côte jusqu'à Ctrl+C.
///
/// `build_handler` reçoit le pool pour monter le handler métier du service.
pub async fn run_inbox_workers<F, Fut>(service_name: &str, build_handler: F) -> AppResult<()>
where
    F: FnOnce(PgPool) -> Fut,
    Fut: Future<Output = AppResult<Arc<dyn InboxMessageHandler>>>,
{
    init_tracing();
    tracing::info!("⚙️ Starting inbox workers for {}", service_name);

    let processor_config = InboxProcessorConfig::from_env();
    processor_config.validate()?;
    let retention_config = InboxRetentionConfig::from_env();
    retention_config.validate()?;

    let postgres = PostgresContext::builder()?.build().await?;
    let pool = postgres.pool();
    run_kernel_postgres_migrations(&pool).await?;

    let store = Arc::new(PostgresInboxStore::new(pool.clone()));
    let handler = build_handler(pool.clone()).await?;

    let processor = InboxProcessor::new(
        store.clone(),
        Arc::new(PostgresTransactionManager::new(pool)),
        handler,
        Arc::new(SystemClock),
        processor_config,
    );
    let retention = InboxRetentionWorker::new(store, retention_config);

    let shutdown = shutdown_channel();
    tokio::join!(processor.run(shutdown.clone()), retention.run(shutdown));

    tracing::info!("👋 Inbox workers for {} exited clean", service_name);
    Ok(())
}
