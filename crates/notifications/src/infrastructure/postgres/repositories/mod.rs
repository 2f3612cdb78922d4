mod postgres_notification_repository;

pub use postgres_notification_repository::PostgresNotificationRepository;
