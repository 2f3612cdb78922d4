pub mod events;
pub mod inbox;
pub mod outbox;
pub mod repositories;
pub mod transaction;
