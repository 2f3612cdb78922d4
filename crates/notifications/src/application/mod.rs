pub mod handle_friend_request_event;
