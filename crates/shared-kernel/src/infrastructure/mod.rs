// crates/shared-kernel/src/infrastructure/mod.rs

pub mod bootstrap;
pub mod memory;

#[cfg(feature = "postgres")]
pub mod postgres;

#[cfg(feature = "kafka")]
pub mod kafka;
