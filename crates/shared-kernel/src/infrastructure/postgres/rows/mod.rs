mod postgres_inbox_message_row;
mod postgres_outbox_event_row;

pub use postgres_inbox_message_row::InboxMessageRow;
pub use postgres_outbox_event_row::OutboxEventRow;
