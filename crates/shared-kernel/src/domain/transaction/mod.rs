mod isolation_level;
mod transaction;
mod transaction_manager;

pub use isolation_level::IsolationLevel;
pub use transaction::Transaction;
pub use transaction_manager::{boxed_work, TransactionManager, TransactionManagerExt, TransactionWork};
