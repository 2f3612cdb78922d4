// crates/notifications/src/infrastructure/postgres/repositories/postgres_notification_repository.rs

use async_trait::async_trait;
use sqlx::PgPool;
use shared_kernel::errors::Result;
use shared_kernel::infrastructure::postgres::SqlxErrorExt;
use crate::domain::entities::Notification;
use crate::domain::repositories::NotificationRepository;
use crate::infrastructure::postgres::rows::NotificationRow;

pub struct PostgresNotificationRepository {
    pool: PgPool,
}

impl PostgresNotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationRepository for PostgresNotificationRepository {
    async fn save(&self, notification: &Notification) -> Result<bool> {
        let done = sqlx::query(
            r#"
            INSERT INTO notifications (id, recipient_id, kind, actor_id, source_event_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (source_event_id) DO NOTHING
            "#,
        )
            .bind(notification.id)
            .bind(&notification.recipient_id)
            .bind(notification.kind.as_str())
            .bind(&notification.actor_id)
            .bind(&notification.source_event_id)
            .bind(notification.created_at)
            .execute(&self.pool)
            .await
            .map_domain("notification")?;

        Ok(done.rows_affected() == 1)
    }

    async fn find_by_recipient(&self, recipient_id: &str, limit: i64) -> Result<Vec<Notification>> {
        let rows: Vec<NotificationRow> = sqlx::query_as(
            r#"
            SELECT id, recipient_id, kind, actor_id, source_event_id, created_at
            FROM notifications
            WHERE recipient_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
            .bind(recipient_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_domain_infra("Failed to fetch notifications")?;

        rows.into_iter().map(Notification::try_from).collect()
    }
}
