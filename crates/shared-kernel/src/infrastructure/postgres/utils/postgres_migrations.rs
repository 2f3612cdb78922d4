// crates/shared-kernel/src/infrastructure/postgres/utils/postgres_migrations.rs

use crate::errors::Result;
use crate::infrastructure::postgres::mappers::SqlxErrorExt;

/// Tables `outbox_events` et `inbox_messages` (idempotent).
pub async fn run_kernel_postgres_migrations(pool: &sqlx::PgPool) -> Result<()> {
    let schema = include_str!("../../../../migrations/postgres/202601010000_foundation.sql");

    sqlx::raw_sql(schema)
        .execute(pool)
        .await
        .map_domain_infra("Failed to apply kernel migrations")?;

    tracing::info!("Shared kernel migrations applied");
    Ok(())
}
