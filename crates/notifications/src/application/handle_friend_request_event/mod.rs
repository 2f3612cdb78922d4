mod friend_request_event;
mod friend_request_event_handler;


pub use friend_request_event::{FriendRequestCreated, FriendRequestEvent, FriendRequestUpdated};
pub use friend_request_event_handler::FriendRequestEventHandler;
