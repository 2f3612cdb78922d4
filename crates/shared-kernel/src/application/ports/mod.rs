mod batch_publish_handler;
mod inbox_message_handler;

pub use batch_publish_handler::{BatchPublishHandler, BatchPublishOutcome, DeliveryResult};
pub use inbox_message_handler::InboxMessageHandler;
