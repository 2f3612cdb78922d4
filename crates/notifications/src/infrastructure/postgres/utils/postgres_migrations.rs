// crates/notifications/src/infrastructure/postgres/utils/postgres_migrations.rs

use shared_kernel::errors::Result;
use shared_kernel::infrastructure::postgres::SqlxErrorExt;

pub async fn run_notifications_postgres_migrations(pool: &sqlx::PgPool) -> Result<()> {
    let schema = include_str!("../../../../migrations/postgres/202601020000_notifications.sql");

    sqlx::raw_sql(schema)
        .execute(pool)
        .await
        .map_domain_infra("Failed to apply notifications migrations")?;

    tracing::info!("Notifications migrations applied");
    Ok(())
}
