mod postgres_event_store;
mod postgres_inbox_store;

pub use postgres_event_store::PostgresEventStore;
pub use postgres_inbox_store::PostgresInboxStore;
