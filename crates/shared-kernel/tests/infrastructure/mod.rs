// crates/shared-kernel/tests/infrastructure/mod.rs

mod event_store_it;
mod inbox_store_it;
mod transaction_manager_it;
