mod outbox_event;
mod search_events_options;
mod update_events_options;

pub use outbox_event::OutboxEvent;
pub use search_events_options::SearchEventsOptions;
pub use update_events_options::UpdateEventsOptions;
