pub mod repositories;
pub mod rows;
pub mod utils;

pub use repositories::PostgresNotificationRepository;
pub use utils::run_notifications_postgres_migrations;
