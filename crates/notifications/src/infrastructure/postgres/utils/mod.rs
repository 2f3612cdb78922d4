mod postgres_migrations;

pub use postgres_migrations::run_notifications_postgres_migrations;
