pub mod factories;
pub mod mappers;
pub mod rows;
pub mod stores;
pub mod transactions;
pub mod utils;

pub use factories::{PostgresConfig, PostgresContext, PostgresContextBuilder};
pub use mappers::SqlxErrorExt;
pub use stores::{PostgresEventStore, PostgresInboxStore};
pub use transactions::{PostgresTransaction, PostgresTransactionManager, TransactionExt};
