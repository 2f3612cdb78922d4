mod memory_event_store;
mod memory_inbox_store;
mod memory_transaction;
mod row_locks;

pub use memory_event_store::InMemoryEventStore;
pub use memory_inbox_store::InMemoryInboxStore;
pub use memory_transaction::{InMemoryTransaction, InMemoryTransactionManager};
pub use row_locks::RowLocks;
