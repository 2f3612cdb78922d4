// crates/shared-kernel/tests/common/setup_infrastructure.rs

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use testcontainers::ContainerAsync;
use testcontainers_modules::postgres::Postgres as PostgresImage;
use shared_kernel::domain::inbox::InboxStatus;
use shared_kernel::infrastructure::postgres::utils::setup_test_postgres;

pub async fn setup_postgres_test_db() -> (PgPool, ContainerAsync<PostgresImage>) {
    setup_test_postgres(&[]).await
}

/// Insertion brute, pour préparer un état précis (statut, dates)
pub async fn insert_inbox_message(
    pool: &PgPool,
    id: &str,
    status: InboxStatus,
    attempts: i32,
    received_at: DateTime<Utc>,
    processed_at: Option<DateTime<Utc>>,
) {
    sqlx::query(
        r#"
        INSERT INTO inbox_messages (id, topic, "partition", kafka_offset, payload, status, attempts, received_at, processed_at)
        VALUES ($1, 'social.events', 0, 0, ''::bytea, $2, $3, $4, $5)
        "#,
    )
        .bind(id)
        .bind(status.as_str())
        .bind(attempts)
        .bind(received_at)
        .bind(processed_at)
        .execute(pool)
        .await
        .expect("Failed to seed inbox message");
}
