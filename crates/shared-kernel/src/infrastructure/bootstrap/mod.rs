mod runtime;
pub use runtime::{init_tracing, shutdown_channel};

#[cfg(all(feature = "postgres", feature = "kafka"))]
mod outbox;
#[cfg(all(feature = "postgres", feature = "kafka"))]
pub use outbox::run_outbox_relay;

#[cfg(all(feature = "postgres", feature = "kafka"))]
mod inbox;
#[cfg(all(feature = "postgres", feature = "kafka"))]
pub use inbox::{run_inbox_consumer, run_inbox_workers};
