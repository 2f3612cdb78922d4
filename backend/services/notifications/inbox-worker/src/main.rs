// backend/services/notifications/inbox-worker/src/main.rs

use std::sync::Arc;
use notifications::application::handle_friend_request_event::FriendRequestEventHandler;
use notifications::infrastructure::postgres::{run_notifications_postgres_migrations, PostgresNotificationRepository};
use shared_kernel::application::ports::InboxMessageHandler;
use shared_kernel::clock::SystemClock;
use shared_kernel::errors::{AppError, AppResult};
use shared_kernel::infrastructure::bootstrap::run_inbox_workers;

#[tokio::main]
async fn main() -> AppResult<()> {
    run_inbox_workers("Notifications", |pool| async move {
        run_notifications_postgres_migrations(&pool).await?;

        let handler = FriendRequestEventHandler::new(
            Arc::new(PostgresNotificationRepository::new(pool)),
            Arc::new(SystemClock),
        );
        Ok::<Arc<dyn InboxMessageHandler>, AppError>(Arc::new(handler))
    }).await
}
