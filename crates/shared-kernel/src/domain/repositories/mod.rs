mod event_store;
mod inbox_store;

pub use event_store::EventStore;
pub use inbox_store::InboxStore;
