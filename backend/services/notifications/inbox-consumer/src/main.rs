// backend/services/notifications/inbox-consumer/src/main.rs

use shared_kernel::errors::AppResult;
use shared_kernel::infrastructure::bootstrap::run_inbox_consumer;

#[tokio::main]
async fn main() -> AppResult<()> {
    run_inbox_consumer("Notifications").await
}
