// crates/shared-kernel/tests/common/mod.rs

mod setup_infrastructure;

pub use setup_infrastructure::{insert_inbox_message, setup_postgres_test_db};
