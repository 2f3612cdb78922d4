mod inbox_message;
mod inbox_status;
mod update_inbox_message_params;

pub use inbox_message::InboxMessage;
pub use inbox_status::InboxStatus;
pub use update_inbox_message_params::UpdateInboxMessageParams;
